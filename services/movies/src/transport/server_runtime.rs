use super::*;

pub(super) fn serve_with_listener(
    runtime: SharedRuntime,
    listener: TcpListener,
    worker_count: usize,
    queue_capacity: usize,
) -> std::io::Result<()> {
    let worker_count = worker_count.max(1);
    let queue_capacity = queue_capacity.max(worker_count);
    let (tx, rx) = mpsc::sync_channel::<TcpStream>(queue_capacity);
    let rx = Arc::new(Mutex::new(rx));
    tracing::info!(
        addr = ?listener.local_addr().ok(),
        workers = worker_count,
        queue_capacity,
        "movie transport accepting connections"
    );

    std::thread::scope(|scope| {
        for _ in 0..worker_count {
            let runtime = Arc::clone(&runtime);
            let rx = Arc::clone(&rx);
            scope.spawn(move || {
                loop {
                    let stream = {
                        let guard = match rx.lock() {
                            Ok(guard) => guard,
                            Err(_) => break,
                        };
                        match guard.recv() {
                            Ok(stream) => stream,
                            Err(_) => break,
                        }
                    };
                    if let Err(err) = handle_connection(&runtime, stream) {
                        tracing::warn!(error = %err, "movie transport connection failed");
                    }
                }
            });
        }

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => match tx.try_send(stream) {
                    Ok(()) => {}
                    Err(mpsc::TrySendError::Full(stream)) => {
                        tracing::warn!("movie transport worker queue full, rejecting connection");
                        if let Err(err) = write_backpressure_response(stream, SOCKET_TIMEOUT_SECS)
                        {
                            tracing::warn!(
                                error = %err,
                                "movie transport backpressure response failed"
                            );
                        }
                    }
                    Err(mpsc::TrySendError::Disconnected(_)) => {
                        tracing::error!("movie transport worker queue closed");
                        break;
                    }
                },
                Err(err) => tracing::warn!(error = %err, "movie transport accept error"),
            }
        }
        drop(tx);
    });

    Ok(())
}

pub(super) fn handle_connection(
    runtime: &SharedRuntime,
    mut stream: TcpStream,
) -> std::io::Result<()> {
    stream.set_read_timeout(Some(Duration::from_secs(SOCKET_TIMEOUT_SECS)))?;
    stream.set_write_timeout(Some(Duration::from_secs(SOCKET_TIMEOUT_SECS)))?;

    let parsed = {
        let mut reader = BufReader::new(&mut stream);
        read_http_request(&mut reader)
    };
    let request = match parsed {
        Ok(Some(request)) => request,
        Ok(None) => return Ok(()),
        Err(err) => {
            tracing::warn!(error = %err, "movie transport rejected malformed request");
            return write_response(&mut stream, HttpResponse::bad_request(&err));
        }
    };

    let response = handle_request(runtime, &request);
    write_response(&mut stream, response)
}
