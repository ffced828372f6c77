//! End-to-end test of the client against the real server.
//!
//! Starts the server on a random port over a temporary SQLite store, then
//! drives every client operation over real HTTP using ureq.

use todo_core::{ApiError, CreateTodo, HttpMethod, HttpResponse, TodoClient};
use todo_server::TodoStore;

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Status codes are returned as data so the client decides what they mean.
fn execute(req: todo_core::HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Post, Some(body)) => {
            agent.post(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

#[test]
fn list_create_health_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("todos.db").display());

    // Step 1: start the server on a random port.
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let (ready_tx, ready_rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let store = TodoStore::connect(&url).unwrap();
            store.create_schema().await.unwrap();
            ready_tx.send(()).unwrap();
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            todo_server::run(listener, store).await
        })
        .unwrap();
    });
    ready_rx.recv().unwrap();

    let client = TodoClient::new(&format!("http://{addr}"));

    // Step 2: health.
    let health = client.parse_health(execute(client.build_health())).unwrap();
    assert_eq!(health.status, "UP");

    // Step 3: list is empty.
    let todos = client.parse_list_todos(execute(client.build_list_todos())).unwrap();
    assert!(todos.is_empty(), "expected empty list");

    // Step 4: create.
    let req = client
        .build_create_todo(&CreateTodo {
            title: "Integration test".to_string(),
        })
        .unwrap();
    let msg = client.parse_create_todo(execute(req)).unwrap();
    assert_eq!(msg.message, "Todo added");

    // Step 5: an oversized title is rejected.
    let req = client
        .build_create_todo(&CreateTodo {
            title: "x".repeat(256),
        })
        .unwrap();
    let err = client.parse_create_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::BadRequest { message } if message == "title too long"));

    // Step 6: list has exactly the one todo, with a stable id.
    let todos = client.parse_list_todos(execute(client.build_list_todos())).unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].title, "Integration test");

    let again = client.parse_list_todos(execute(client.build_list_todos())).unwrap();
    assert_eq!(again, todos);
}
