use movies::{
    build_runtime,
    config::{ServiceConfig, TransportRuntime},
    logging,
    transport::serve_http_with_workers,
};

fn main() {
    let serve_mode = std::env::args().any(|arg| arg == "--serve");
    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("movies failed reading configuration: {err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = logging::init(&config) {
        eprintln!("movies failed initializing logging: {err}");
        std::process::exit(1);
    }

    let runtime = build_runtime(&config);
    tracing::info!(
        movies = runtime.movies_len(),
        seeded = config.seed,
        status_codes = ?config.status_codes,
        "movies runtime ready"
    );

    if !serve_mode {
        return;
    }

    let bind_addr = config.bind_addr.as_str();
    tracing::info!(
        addr = %bind_addr,
        workers = config.http_workers,
        queue_capacity = config.http_queue_capacity,
        transport = config.transport_runtime.as_str(),
        "movies transport starting"
    );
    tracing::info!("movies API endpoint: http://{bind_addr}/movies");
    tracing::info!("movies health endpoint: http://{bind_addr}/health");
    tracing::info!("movies metrics endpoint: http://{bind_addr}/metrics");

    match config.transport_runtime {
        TransportRuntime::Std => {
            if let Err(err) = serve_http_with_workers(
                runtime,
                bind_addr,
                config.http_workers,
                config.http_queue_capacity,
            ) {
                tracing::error!(error = %err, "movies transport failed");
                std::process::exit(1);
            }
        }
        TransportRuntime::Axum => {
            #[cfg(feature = "async-transport")]
            {
                if let Err(err) = movies::transport_axum::serve_http_with_axum(
                    runtime,
                    bind_addr,
                    config.http_workers,
                ) {
                    tracing::error!(error = %err, "movies transport failed");
                    std::process::exit(1);
                }
            }
            #[cfg(not(feature = "async-transport"))]
            {
                drop(runtime);
                tracing::error!(
                    "movies transport runtime 'axum' requires build feature 'async-transport'"
                );
                std::process::exit(2);
            }
        }
    }
}
