// src/server/mod.rs
mod handler;

pub use handler::StatusHandler;

use anyhow::Result;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Server};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use tracing::info;

/// Serve the status endpoints until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, handler: StatusHandler, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let make_service = make_service_fn(move |_| {
        let handler = handler.clone();

        async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                let response = handler.handle(&req);
                async move { Ok::<_, Infallible>(response) }
            }))
        }
    });

    let server = Server::try_bind(&addr)?.serve(make_service);
    info!("Status server listening on http://{}", server.local_addr());

    server.with_graceful_shutdown(shutdown).await?;
    Ok(())
}
