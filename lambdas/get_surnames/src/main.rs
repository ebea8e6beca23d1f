use lambda_http::{run, service_fn, tracing, Body, Error, Request, RequestExt, Response};
use surnames_core::{handle, ApiResponse, PgSurnameSource, Settings, SurnameRequest, SurnameSource};

async fn function_handler<S: SurnameSource>(
    settings: &Settings,
    source: &S,
    event: Request,
) -> Result<Response<Body>, Error> {
    let mut request = SurnameRequest::new(event.method().as_str());
    if let Some(date) = event.query_string_parameters().first("date") {
        request = request.with_param("date", date);
    }

    let response = handle(&request, settings, source).await?;
    into_lambda_response(response)
}

fn into_lambda_response(response: ApiResponse) -> Result<Response<Body>, Error> {
    let mut builder = Response::builder().status(response.status_code);
    for (name, value) in response.headers {
        builder = builder.header(name, value);
    }

    Ok(builder.body(Body::from(response.body))?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    let source = PgSurnameSource;

    run(service_fn(|event| function_handler(&settings, &source, event))).await
}
