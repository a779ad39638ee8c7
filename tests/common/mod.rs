//! A throwaway HTTP backend on a loopback port.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

/// Answer `requests` requests, then stop. `GET .../map-data/KE` gets the Kenya
/// boundary; everything else is a 404. Returns the API base URL.
pub fn serve(requests: usize) -> String {
    const KENYA_BOUNDARY: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"ISO_A2":"KE","NAME":"Kenya"},"geometry":{"type":"Polygon","coordinates":[[[34.0,-4.7],[41.9,-4.7],[41.9,5.0],[34.0,5.0],[34.0,-4.7]]]}}]}"#;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming().take(requests) {
            let mut stream = stream.unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap() <= 2 {
                    break;
                }
            }
            let path = request_line.split_whitespace().nth(1).unwrap_or_default();
            let (status, body) = if path.ends_with("/map-data/KE") {
                ("200 OK", KENYA_BOUNDARY)
            } else {
                ("404 Not Found", r#"{"detail":"Not found"}"#)
            };
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
        }
    });
    format!("http://{}/api/v1", addr)
}
