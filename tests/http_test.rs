// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fetch tests against a canned local HTTP server.

use anyhow::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use homeops::http::{fetch_text, FetchConfig};
use homeops::OpsError;

/// Serves one request with a fixed 200 response body.
async fn start_server(body: &'static str) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = stream.read(&mut request).await.unwrap();
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
    });
    Ok(format!("http://{addr}/"))
}

#[tokio::test]
async fn fetch_text_returns_trimmed_body() -> Result<()> {
    let url = start_server("  hello \n").await?;
    let config = FetchConfig::default().with_user_agent("test/1.0");

    assert_eq!(fetch_text(&url, &config).await?, "hello");
    Ok(())
}

#[tokio::test]
async fn refused_server_exhausts_retries() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("http://{}/", listener.local_addr()?);
    drop(listener);

    let config = FetchConfig::default()
        .with_attempts(1)
        .with_user_agent("test/1.0");

    match fetch_text(&url, &config).await {
        Err(OpsError::RetriesExhausted(_)) => Ok(()),
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}
