use docmonad::{memory::InMemoryTransport, prelude::*};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct User {
    name: String,
    age: u32,
}

fn connect(transport: &InMemoryTransport) -> Connection<&InMemoryTransport> {
    Connection::builder("http://localhost:3000/", "API_KEY")
        .build(transport)
        .unwrap()
}

#[tokio::test]
async fn monadic_program_is_sent_in_order() {
    let transport = InMemoryTransport::new();
    transport.respond_with(json!(["Lisbon", "Oslo"])).await;

    let conn = connect(&transport);
    let users = conn.collection("Users").unwrap();
    let posts = conn.collection("Posts").unwrap();

    let result = users
        .monadic()
        .filter("user.age", ">=", 18)
        .unwrap()
        .map_attrs("user.post_ids")
        .unwrap()
        .flat_map_arr()
        .map_id_to_collection(&posts)
        .map_attrs("post.address.city")
        .unwrap()
        .limit(10)
        .unwrap()
        .with_id()
        .execute(Mode::Normal)
        .await
        .unwrap();

    assert_eq!(result, Outcome::Final(json!(["Lisbon", "Oslo"])));

    let request = transport.last_request().await.unwrap();
    assert_eq!(request.url.as_str(), "http://localhost:3000/Users");
    assert_eq!(request.header("Content-Type"), Some("application/json;charset=utf-8"));
    assert_eq!(request.header("Authorization"), Some("API_KEY"));
    assert_eq!(
        request.json_body().unwrap(),
        json!({
            "action": "Monadic",
            "action_body": {
                "operations": [
                    { "op": "where", "data": { "attrs": ["age"], "cmp": ">=", "val": 18 } },
                    { "op": "mapAttrs", "data": ["post_ids"] },
                    { "op": "flatMapArr" },
                    { "op": "mapIDToCollection", "data": "Posts" },
                    { "op": "mapAttrs", "data": ["address", "city"] },
                    { "op": "limit", "data": 10 },
                    { "op": "withID" },
                ]
            },
            "debug": false,
        })
    );
}

#[tokio::test]
async fn debug_mode_returns_the_trace() {
    let trace = json!({ "states": [[1, 2, 3], [2, 3]], "env": { "collection": "Users" } });
    let transport = InMemoryTransport::new();
    transport.respond_with(trace.clone()).await;

    let conn = connect(&transport);
    let query = conn.collection("Users").unwrap().monadic().filter("d.n", ">", 1).unwrap();

    let outcome = query.execute(Mode::Debug).await.unwrap();
    assert_eq!(outcome.into_trace(), Some(trace));

    let body = transport.last_request().await.unwrap().json_body().unwrap();
    assert_eq!(body["debug"], json!(true));
}

#[tokio::test]
async fn executing_twice_replays_the_same_program() {
    let transport = InMemoryTransport::new();
    let conn = connect(&transport);
    let query = conn.collection("Users").unwrap().monadic().map_attrs("doc.a").unwrap();

    query.execute(Mode::Normal).await.unwrap();
    query.execute(Mode::Normal).await.unwrap();

    let bodies = transport.bodies().await.unwrap();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn validation_errors_never_reach_the_transport() {
    let transport = InMemoryTransport::new();
    let conn = connect(&transport);
    let users = conn.collection("Users").unwrap();
    let query = users.monadic().map_attrs("doc.a").unwrap();

    let err = query.filter("badchain", "==", 1).unwrap_err();
    assert!(matches!(err, ClientError::MalformedChain(_)));
    assert!(err.is_validation());
    assert!(matches!(query.filter("doc.a", "!=", 1), Err(ClientError::UnknownComparator(_))));
    assert!(matches!(query.limit("5"), Err(ClientError::InvalidLimit(_))));

    assert_eq!(query.len(), 1);
    assert_eq!(transport.request_count().await, 0);
}

#[tokio::test]
async fn all_documents_are_keyed_by_id() {
    let raw = json!([["id1", { "x": 1 }], ["id2", { "x": 2 }]]);
    let transport = InMemoryTransport::new();
    transport.respond_with(raw.clone()).await;
    transport.respond_with(raw.clone()).await;

    let conn = connect(&transport);
    let users = conn.collection("Users").unwrap();

    let docs = users.all_documents().get(Mode::Normal).await.unwrap().into_final().unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs["id1"], json!({ "x": 1 }));
    assert_eq!(docs["id2"], json!({ "x": 2 }));

    let trace = users.all_documents().get(Mode::Debug).await.unwrap();
    assert_eq!(trace, Outcome::Trace(raw));

    let bodies = transport.bodies().await.unwrap();
    assert_eq!(bodies[0], json!({ "action": "AllDocuments", "action_body": {}, "debug": false }));
    assert_eq!(bodies[1]["debug"], json!(true));
}

#[tokio::test]
async fn single_shot_actions_carry_their_bodies() {
    let transport = InMemoryTransport::new();
    let conn = connect(&transport);
    let users = conn.collection("Users").unwrap();

    users
        .insert_doc(User { name: "Ada".into(), age: 36 })
        .unwrap()
        .send()
        .await
        .unwrap();
    users
        .update_doc("DOC_ID", json!({ "name": "Ada Lovelace" }))
        .unwrap()
        .send()
        .await
        .unwrap();
    users.document("DOC_ID").unwrap().get(Mode::Debug).await.unwrap();
    conn.create_collection("Posts").unwrap().send().await.unwrap();
    conn.collection_list().get().await.unwrap();

    let requests = transport.requests().await;
    let bodies: Vec<Value> = requests.iter().map(|r| r.json_body().unwrap()).collect();

    assert_eq!(
        bodies,
        vec![
            json!({ "action": "Insert", "action_body": { "doc_data": { "name": "Ada", "age": 36 } }, "debug": false }),
            json!({ "action": "Update", "action_body": { "doc_id": "DOC_ID", "doc_data": { "name": "Ada Lovelace" } }, "debug": false }),
            json!({ "action": "Document", "action_body": { "doc_id": "DOC_ID" }, "debug": true }),
            json!({ "action": "CollectionCreate", "action_body": { "name": "Posts" }, "debug": false }),
            json!({ "action": "CollectionList", "action_body": {}, "debug": false }),
        ]
    );

    assert_eq!(requests[0].url.as_str(), "http://localhost:3000/Users");
    assert_eq!(requests[3].url.as_str(), "http://localhost:3000/");
    assert!(requests.iter().all(|r| r.method == Method::Post));
    assert_eq!(
        requests.iter().map(|r| r.advisory_method).collect::<Vec<_>>(),
        vec![Method::Post, Method::Post, Method::Get, Method::Post, Method::Get]
    );
}

#[tokio::test]
async fn transport_failures_are_returned_unchanged() {
    let transport = InMemoryTransport::new();
    transport
        .fail_with(ClientError::Remote { status: 500, message: "interpreter crashed".into() })
        .await;

    let conn = connect(&transport);
    let err = conn
        .collection("Users")
        .unwrap()
        .monadic()
        .with_id()
        .execute(Mode::Normal)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Remote { status: 500, ref message } if message == "interpreter crashed"
    ));
    assert!(!err.is_validation());
    assert_eq!(transport.request_count().await, 1);
}

#[tokio::test]
async fn boxed_transports_work_as_trait_objects() {
    let transport = InMemoryTransport::new();
    let boxed: Box<dyn Transport> = Box::new(transport.clone());

    let conn = Connection::builder("http://localhost:3000", "API_KEY").build(boxed).unwrap();
    conn.collection_list().get().await.unwrap();

    assert_eq!(transport.request_count().await, 1);
}
