use log_tail::{TailEvent, TailOptions, TailReader, TailStream};
use std::path::Path;
use std::time::Duration;
use tokio_stream::StreamExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "app.log".to_string());

    // Report transitions on stderr instead of through tracing.
    let options = TailOptions::new()
        .poll_interval(Duration::from_millis(100))
        .eof_wait(Duration::from_secs(30))
        .events(|path: &Path, event: TailEvent| {
            eprintln!("[{}] {}", path.display(), event);
        });

    let reader = TailReader::open(&path, options).await?;
    println!("Following {} - emitting chunks...", path);

    let mut stream = TailStream::new(reader);
    let mut count = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        count += 1;
        println!("chunk #{} ({} bytes):", count, chunk.len());
        print!("{}", String::from_utf8_lossy(&chunk));
    }

    println!("Stream ended after {} chunks", count);
    Ok(())
}
