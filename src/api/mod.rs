use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{ContributionCadence, Inputs, Projection, run_projection};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const MAX_DURATION_YEARS: u32 = 1000;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCadence {
    PerMonth,
    PerYear,
}

impl From<CliCadence> for ContributionCadence {
    fn from(value: CliCadence) -> Self {
        match value {
            CliCadence::PerMonth => ContributionCadence::PerMonth,
            CliCadence::PerYear => ContributionCadence::PerYear,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ApiCadence {
    #[serde(alias = "perMonth", alias = "per_month", alias = "month")]
    PerMonth,
    #[serde(alias = "perYear", alias = "per_year", alias = "year")]
    PerYear,
}

impl From<ApiCadence> for CliCadence {
    fn from(value: ApiCadence) -> Self {
        match value {
            ApiCadence::PerMonth => CliCadence::PerMonth,
            ApiCadence::PerYear => CliCadence::PerYear,
        }
    }
}

impl From<ContributionCadence> for ApiCadence {
    fn from(value: ContributionCadence) -> Self {
        match value {
            ContributionCadence::PerMonth => ApiCadence::PerMonth,
            ContributionCadence::PerYear => ApiCadence::PerYear,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    start_capital: Option<f64>,
    income: Option<f64>,
    income_cadence: Option<ApiCadence>,
    duration_years: Option<u32>,
    growth_rate: Option<f64>,
    inflation_rate: Option<f64>,
    takeout_start_year: Option<u32>,
    takeout_per_year: Option<f64>,
    adjust_takeout: Option<bool>,
}

#[derive(Parser, Debug)]
#[command(
    name = "investviz",
    about = "Year-by-year investment projection (contributions, net growth, scheduled takeout)"
)]
struct Cli {
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Capital already invested at year zero"
    )]
    start_capital: f64,
    #[arg(long, default_value_t = 1000.0, help = "Recurring contribution amount")]
    income: f64,
    #[arg(
        long,
        value_enum,
        default_value_t = CliCadence::PerMonth,
        help = "Whether --income is contributed per month or per year"
    )]
    income_cadence: CliCadence,
    #[arg(long, default_value_t = 10, help = "Projection horizon in years")]
    duration_years: u32,
    #[arg(
        long,
        default_value_t = 4.0,
        help = "Expected annual growth in percent"
    )]
    growth_rate: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Expected annual inflation in percent"
    )]
    inflation_rate: f64,
    #[arg(
        long,
        help = "First year withdrawals apply; defaults to the final projection year"
    )]
    takeout_start_year: Option<u32>,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Withdrawal per year once the takeout phase starts; 0 disables it"
    )]
    takeout_per_year: f64,
    #[arg(
        long,
        default_value_t = false,
        help = "Grow the withdrawal with inflation each active year"
    )]
    adjust_takeout: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    duration_years: u32,
    cadence: ApiCadence,
    annual_contribution: f64,
    net_growth_percent: f64,
    takeout_start_year: u32,
    takeout_active: bool,
    years: Vec<u32>,
    contributed: Vec<f64>,
    capital: Vec<f64>,
    withdrawn: Vec<f64>,
}

fn build_config(cli: Cli) -> Result<Inputs, String> {
    if !cli.start_capital.is_finite() || cli.start_capital < 0.0 {
        return Err("--start-capital must be >= 0".to_string());
    }

    if !cli.income.is_finite() || cli.income < 0.0 {
        return Err("--income must be >= 0".to_string());
    }

    if cli.duration_years > MAX_DURATION_YEARS {
        return Err(format!("--duration-years must be <= {MAX_DURATION_YEARS}"));
    }

    if !(0.0..=50.0).contains(&cli.growth_rate) {
        return Err("--growth-rate must be between 0 and 50".to_string());
    }

    if !(0.0..=10.0).contains(&cli.inflation_rate) {
        return Err("--inflation-rate must be between 0 and 10".to_string());
    }

    if !cli.takeout_per_year.is_finite() || cli.takeout_per_year < 0.0 {
        return Err("--takeout-per-year must be >= 0".to_string());
    }

    // The takeout slider in the web form defaults to the final year.
    let takeout_start_year = cli.takeout_start_year.unwrap_or(cli.duration_years.max(1));
    if cli.duration_years >= 1 && !(1..=cli.duration_years).contains(&takeout_start_year) {
        return Err("--takeout-start-year must be between 1 and --duration-years".to_string());
    }

    Ok(Inputs {
        start_capital: cli.start_capital,
        periodic_contribution: cli.income,
        contribution_cadence: cli.income_cadence.into(),
        duration_years: cli.duration_years,
        annual_growth_percent: cli.growth_rate,
        annual_inflation_percent: cli.inflation_rate,
        takeout_start_year,
        takeout_amount_per_year: cli.takeout_per_year,
        adjust_takeout_for_inflation: cli.adjust_takeout,
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("Investment projection API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

pub fn run_projection_cli() -> Result<(), String> {
    let cli = Cli::parse();
    let inputs = build_config(cli)?;
    let projection = run_projection(&inputs);
    let response = build_project_response(&inputs, projection);
    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| format!("Failed to serialize projection: {e}"))?;
    println!("{json}");
    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

fn project_handler_impl(payload: ProjectPayload) -> Response {
    let inputs = match config_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let projection = run_projection(&inputs);
    let response = build_project_response(&inputs, projection);
    json_response(StatusCode::OK, response)
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn config_from_json(json: &str) -> Result<Inputs, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    config_from_payload(payload)
}

fn config_from_payload(payload: ProjectPayload) -> Result<Inputs, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.start_capital {
        cli.start_capital = v;
    }
    if let Some(v) = payload.income {
        cli.income = v;
    }
    if let Some(v) = payload.income_cadence {
        cli.income_cadence = v.into();
    }
    if let Some(v) = payload.duration_years {
        cli.duration_years = v;
    }
    if let Some(v) = payload.growth_rate {
        cli.growth_rate = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.takeout_start_year {
        cli.takeout_start_year = Some(v);
    }
    if let Some(v) = payload.takeout_per_year {
        cli.takeout_per_year = v;
    }
    if let Some(v) = payload.adjust_takeout {
        cli.adjust_takeout = v;
    }

    build_config(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        start_capital: 0.0,
        income: 1_000.0,
        income_cadence: CliCadence::PerMonth,
        duration_years: 10,
        growth_rate: 4.0,
        inflation_rate: 0.0,
        takeout_start_year: None,
        takeout_per_year: 0.0,
        adjust_takeout: false,
    }
}

fn build_project_response(inputs: &Inputs, projection: Projection) -> ProjectResponse {
    let takeout_active = inputs.takeout_amount_per_year > 0.0 && inputs.duration_years >= 1;

    ProjectResponse {
        duration_years: inputs.duration_years,
        cadence: inputs.contribution_cadence.into(),
        annual_contribution: inputs.annual_contribution(),
        net_growth_percent: inputs.net_growth_percent(),
        takeout_start_year: inputs.takeout_start_year,
        takeout_active,
        years: projection.years,
        contributed: projection.contributed,
        capital: projection.capital,
        withdrawn: projection.withdrawn,
    }
}
