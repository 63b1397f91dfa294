//! In-process HTTP server for client tests.

use std::sync::{Arc, Mutex};

use axum::Router;

/// Serve `app` on a random local port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Captures whatever a handler saw, for assertions after the call.
#[derive(Clone, Default)]
pub struct Seen<T: Clone + Default>(Arc<Mutex<T>>);

impl<T: Clone + Default> Seen<T> {
    pub fn set(&self, value: T) {
        *self.0.lock().unwrap() = value;
    }

    pub fn get(&self) -> T {
        self.0.lock().unwrap().clone()
    }
}
