use bwalloc::config::ml::{ForecasterConfig, UpdateRule};
use bwalloc::error::BwallocError;
use bwalloc::ml::{MinMaxScaler, NarForecaster};

fn demand_series(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64;
            50.0 + 20.0 * (t * 0.25).sin() + 5.0 * (t * 0.05).cos()
        })
        .collect()
}

fn small_config() -> ForecasterConfig {
    ForecasterConfig {
        input_size: 6,
        hidden_size: 16,
        output_size: 1,
        num_epochs: 200,
        learning_rate: 0.05,
        future_steps: 12,
        seed: Some(11),
        ..Default::default()
    }
}

#[test]
fn test_forecast_yields_requested_steps() {
    let series = demand_series(80);
    let mut forecaster = NarForecaster::new(ForecasterConfig {
        num_epochs: 20,
        ..small_config()
    })
    .unwrap();
    forecaster.train(&series, 20).unwrap();

    let seed = &series[series.len() - 6..];
    for steps in [0, 1, 5, 12] {
        let values: Vec<f64> = forecaster.predict(seed, steps).unwrap().collect();
        assert_eq!(values.len(), steps);
        assert!(values.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn test_predict_is_repeatable() {
    let series = demand_series(80);
    let mut forecaster = NarForecaster::new(small_config()).unwrap();
    forecaster.train(&series, 30).unwrap();

    let seed = &series[..6];
    let first: Vec<f64> = forecaster.predict(seed, 8).unwrap().collect();
    let second: Vec<f64> = forecaster.predict(seed, 8).unwrap().collect();
    assert_eq!(first, second);
}

#[test]
fn test_scaler_round_trips_extremes() {
    let series = demand_series(80);
    let mut forecaster = NarForecaster::new(small_config()).unwrap();
    forecaster.train(&series, 5).unwrap();

    let scaler = forecaster.scaler().unwrap();
    for value in [scaler.min(), scaler.max()] {
        let restored = scaler.inverse_transform(scaler.transform(value));
        assert!((restored - value).abs() < 1e-9);
    }

    let standalone = MinMaxScaler::fit(&series).unwrap();
    assert_eq!(&standalone, scaler);
}

#[test]
fn test_sgd_training_reduces_loss() {
    let series = demand_series(120);
    let mut forecaster = NarForecaster::new(small_config()).unwrap();

    let report = forecaster.train(&series, 200).unwrap();

    let first = report.losses[0];
    let last = report.final_loss().unwrap();
    assert_eq!(report.epochs, 200);
    assert!(last < first, "loss went from {} to {}", first, last);
}

#[test]
fn test_adam_training_reduces_loss() {
    let series = demand_series(120);
    let mut forecaster = NarForecaster::new(ForecasterConfig {
        update_rule: UpdateRule::Adam,
        learning_rate: 0.01,
        ..small_config()
    })
    .unwrap();

    let report = forecaster.train(&series, 150).unwrap();

    let first = report.losses[0];
    let last = report.final_loss().unwrap();
    assert!(last < first, "loss went from {} to {}", first, last);
}

#[test]
fn test_retraining_replaces_model() {
    let mut forecaster = NarForecaster::new(small_config()).unwrap();
    forecaster.train(&demand_series(80), 10).unwrap();
    let first_max = forecaster.scaler().unwrap().max();

    let doubled: Vec<f64> = demand_series(80).iter().map(|v| v * 2.0).collect();
    forecaster.train(&doubled, 10).unwrap();

    assert!((forecaster.scaler().unwrap().max() - 2.0 * first_max).abs() < 1e-9);
}

#[test]
fn test_seed_window_must_match_input_size() {
    let series = demand_series(80);
    let mut forecaster = NarForecaster::new(small_config()).unwrap();
    forecaster.train(&series, 5).unwrap();

    match forecaster.predict(&series[..4], 3) {
        Err(BwallocError::Shape { expected, actual, .. }) => {
            assert_eq!(expected, 6);
            assert_eq!(actual, 4);
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("short seed window should be rejected"),
    }
}

#[test]
fn test_untrained_forecaster_refuses_to_predict() {
    let forecaster = NarForecaster::new(small_config()).unwrap();
    assert!(!forecaster.is_fitted());
    assert!(matches!(
        forecaster.predict(&[1.0; 6], 4),
        Err(BwallocError::NotFitted(_))
    ));
}

#[test]
fn test_zero_epochs_rejected() {
    let mut forecaster = NarForecaster::new(small_config()).unwrap();
    assert!(matches!(
        forecaster.train(&demand_series(40), 0),
        Err(BwallocError::Configuration(_))
    ));
    assert!(!forecaster.is_fitted());
}
