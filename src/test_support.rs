// Helpers shared by the unit tests: a one-route HTTP server and sample data.

use flate2::{write::GzEncoder, Compression};
use std::{
    io::Write,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

pub const SAMPLE_CSV: &str = "\
VendorID,lpep_pickup_datetime,lpep_dropoff_datetime,store_and_fwd_flag,passenger_count,trip_distance,total_amount
2,2019-12-18 15:52:30,2019-12-18 15:54:39,N,5,0.00,4.81
2,2020-01-01 00:45:58,2020-01-01 00:56:39,N,2,1.28,24.36
2,2020-01-01 00:41:38,2020-01-01 00:52:49,N,1,2.47,15.34
1,2020-01-01 00:52:46,2020-01-01 01:14:21,N,1,6.30,25.05
";

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(bytes).expect("gzip into memory");
    enc.finish().expect("finish gzip")
}

/// Serves the same canned response to every request and counts the hits.
pub struct StubServer {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl StubServer {
    pub async fn start(status: u16, body: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        let hits = Arc::new(AtomicUsize::new(0));
        let body = Arc::new(body);

        let counter = hits.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let body = body.clone();
                tokio::spawn(async move {
                    let _ = respond(stream, status, &body).await;
                });
            }
        });

        Self { addr, hits }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn respond(mut stream: TcpStream, status: u16, body: &[u8]) -> std::io::Result<()> {
    // Drain the request head; GETs carry no body.
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }

    let reason = if status == 200 { "OK" } else { "Error" };
    let header = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason,
        body.len()
    );
    stream.write_all(header.as_bytes()).await?;
    stream.write_all(body).await?;
    stream.shutdown().await
}

/// A loopback URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind probe");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{}", addr)
}
