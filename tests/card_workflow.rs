//! End-to-end card workflow: debounced search, pick, generate, export.

use travelcard::export::{self, CARD_HEIGHT, CARD_WIDTH};
use travelcard::{
    CardState, ForecastOrchestrator, ForecastProvider, Location, OpenMeteoClient,
    SearchDebouncer, TravelCardConfig,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_open_meteo(expected_searches: u64) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "San Sebastián"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "name": "San Sebastián",
                "latitude": 43.31283,
                "longitude": -1.97499,
                "country": "Spain",
                "admin1": "Basque Country",
                "timezone": "Europe/Madrid"
            }]
        })))
        .expect(expected_searches)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "daily": {
                "time": [
                    "2026-08-03", "2026-08-04", "2026-08-05", "2026-08-06",
                    "2026-08-07", "2026-08-08", "2026-08-09"
                ],
                "weather_code": [1, 2, 0, 0, 61, 3, 80],
                "temperature_2m_max": [24.2, 25.0, 27.4, 27.1, 22.0, 23.3, 21.8],
                "temperature_2m_min": [17.1, 17.8, 18.9, 19.0, 16.4, 16.0, 15.2],
                "precipitation_probability_max": [10, 15, 0, 0, 70, 20, 55]
            }
        })))
        .mount(&server)
        .await;

    server
}

fn config_for(server: &MockServer, output_dir: &std::path::Path) -> TravelCardConfig {
    let mut config = TravelCardConfig::default();
    config.api.geocoding_url = format!("{}/v1/search", server.uri());
    config.api.forecast_url = format!("{}/v1/forecast", server.uri());
    config.search.debounce_ms = 50;
    config.export.output_dir = output_dir.to_string_lossy().into_owned();
    config
}

#[tokio::test]
async fn test_typing_to_exported_card() {
    let server = mock_open_meteo(1).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&server, dir.path());
    let client = OpenMeteoClient::new(&config).unwrap();

    let mut orchestrator = ForecastOrchestrator::new(config.search.min_query_chars);
    let debouncer = SearchDebouncer::from_config(&config.search, orchestrator.search_sequence());

    // keystrokes arrive faster than the window; only the last one searches
    let early = orchestrator.edit_query("San").unwrap();
    let typed = orchestrator.edit_query("San Sebastián").unwrap();
    let (stale, fresh) = tokio::join!(
        debouncer.search(&client, early.ticket, &early.query),
        debouncer.search(&client, typed.ticket, &typed.query),
    );
    assert!(stale.is_none());
    assert!(orchestrator.apply_search(typed.ticket, fresh.unwrap()));
    assert_eq!(orchestrator.suggestions().len(), 1);

    orchestrator.pick_suggestion(0).unwrap();
    assert!(orchestrator.can_generate());

    let state = orchestrator.generate(&client).await;
    let CardState::Success { forecast } = state else {
        panic!("expected a forecast, got {}", state.name());
    };

    // Wed 27 - 0 ties Thu 27 - 0; the earlier day wins
    assert_eq!(forecast.best_day_index(), 2);
    assert_eq!(forecast.best_day().full_day_name(), "Wednesday");

    let summary = export::summary_text(forecast);
    assert!(summary.starts_with("San Sebastián, Spain — Aug 3 – Aug 9\n\nBest day: Wednesday\n\n"));
    assert!(summary.contains("Mon 24/17 10% • Tue 25/18 15% • Wed 27/19 0%"));

    let path = export::resolve_png_path(None, std::path::Path::new(&config.export.output_dir), forecast);
    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        "weather-san-sebastián-2026-08-03.png"
    );
    export::write_png(forecast, &path).unwrap();
    assert_eq!(
        image::image_dimensions(&path).unwrap(),
        (CARD_WIDTH, CARD_HEIGHT)
    );
}

#[tokio::test]
async fn test_reselecting_during_fetch_keeps_new_location() {
    let server = mock_open_meteo(0).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&server, dir.path());
    let client = OpenMeteoClient::new(&config).unwrap();

    let mut orchestrator = ForecastOrchestrator::default();
    let bilbao = Location::new("Bilbao", 43.26271, -2.92528, "Spain", "Europe/Madrid");
    let biarritz =
        Location::new("Biarritz", 43.48055, -1.55619, "France", "Europe/Paris");

    orchestrator.select_location(bilbao);
    let ticket = orchestrator.begin_generate().unwrap();
    let result = client.fetch_forecast(&ticket.location).await;

    orchestrator.select_location(biarritz.clone());
    assert!(!orchestrator.complete_generate(ticket, result));
    assert_eq!(orchestrator.selected_location(), Some(&biarritz));
    assert!(orchestrator.forecast().is_none());
}
