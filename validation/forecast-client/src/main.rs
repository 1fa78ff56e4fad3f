//! Forecast client CLI: issues one `GET /forecast` and prints the result.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "forecast-client")]
#[command(about = "Request a point forecast from the forecast API", long_about = None)]
struct Cli {
    /// Base URL of the forecast API
    #[arg(short, long, default_value = "http://127.0.0.1:8000")]
    url: String,

    /// Forecast initialization date (YYYY-MM-DD)
    #[arg(long, default_value = "2023-04-18")]
    init_date: String,

    /// Latitude (defaults to Madrid)
    #[arg(long, default_value_t = 40.416775, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude (defaults to Madrid)
    #[arg(long, default_value_t = -3.703790, allow_negative_numbers = true)]
    lon: f64,

    /// Forecast model: graph, gen or gfs
    #[arg(short, long, default_value = "gfs")]
    model: String,

    /// Comma-separated variables; empty requests every variable
    #[arg(
        short,
        long,
        default_value = "temperature_2m_above_ground,total_precipitation_surface"
    )]
    variables: String,
}

impl Cli {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("init_date", self.init_date.clone()),
            ("lat", self.lat.to_string()),
            ("lon", self.lon.to_string()),
            ("model", self.model.clone()),
        ];
        if !self.variables.is_empty() {
            query.push(("variables", self.variables.clone()));
        }
        query
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let endpoint = format!("{}/forecast", cli.url.trim_end_matches('/'));

    let response = match reqwest::Client::new()
        .get(&endpoint)
        .query(&cli.query())
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) if e.is_connect() || e.is_timeout() => {
            println!("Connection Error: {}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
            Err(_) => println!("{}", body),
        }
    } else {
        println!("Error: {}", status.as_u16());
        println!("{}", body);
    }

    Ok(())
}
