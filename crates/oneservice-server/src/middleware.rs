use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use oneservice_graphql::handler::REQUEST_ID_HEADER;
use uuid::Uuid;

// Ensures each request carries an X-Request-Id and mirrors it on the response.
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let req_id_value = match req.headers().get(REQUEST_ID_HEADER) {
        Some(value) => value.clone(),
        None => {
            let generated = HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
            // Handlers read the id from the request headers
            req.headers_mut().insert(REQUEST_ID_HEADER, generated.clone());
            generated
        }
    };

    let mut res = next.run(req).await;
    res.headers_mut().insert(REQUEST_ID_HEADER, req_id_value);
    res
}
