use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;

// Accepts a single connection, answers it with `status` and `body`, and
// returns the raw request it received.
pub(crate) fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
  let listener = TcpListener::bind("127.0.0.1:0").unwrap();
  let addr = listener.local_addr().unwrap();
  let handle = thread::spawn(move || {
    let (mut stream, _) = listener.accept().unwrap();
    let request = read_request(&mut BufReader::new(stream.try_clone().unwrap()));

    let mut response = format!("HTTP/1.1 {}\r\nConnection: close\r\n", status);
    if !status.starts_with("204") {
      response.push_str("Content-Type: application/json\r\n");
      response.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    response.push_str("\r\n");
    response.push_str(body);
    stream.write_all(response.as_bytes()).unwrap();
    stream.flush().unwrap();
    request
  });
  (format!("http://{}", addr), handle)
}

fn read_request<R: BufRead>(reader: &mut R) -> String {
  let mut request = String::new();
  let mut content_length = 0;
  loop {
    let mut line = String::new();
    if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
      break;
    }
    if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
      content_length = value.trim().parse().unwrap();
    }
    request.push_str(&line);
  }
  let mut body = vec![0; content_length];
  reader.read_exact(&mut body).unwrap();
  request.push_str("\r\n");
  request.push_str(&String::from_utf8(body).unwrap());
  request
}
