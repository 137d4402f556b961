use approx::assert_relative_eq;
use chrono::NaiveDate;
use walk_forecast::data::DailySeries;
use walk_forecast::utils::{cutoff_before, default_cutoff, forecast_accuracy, horizon_after};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_horizon_after_crosses_year_end() {
    let horizon = horizon_after(ymd(2022, 12, 31), 30).unwrap();

    assert_eq!(horizon.len(), 30);
    assert_eq!(horizon[0], ymd(2023, 1, 1));
    assert_eq!(horizon[29], ymd(2023, 1, 30));
    assert!(horizon.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn test_default_cutoff_leaves_horizon_inside_series() {
    let dates: Vec<NaiveDate> = (0..60)
        .map(|i| ymd(2023, 1, 1) + chrono::Duration::days(i))
        .collect();
    let series = DailySeries::new("x", dates, vec![1.0; 60]).unwrap();

    let cutoff = default_cutoff(&series, 30).unwrap();
    assert_eq!(cutoff, ymd(2023, 1, 30));
    assert_eq!(horizon_after(cutoff, 30).unwrap().last(), Some(&series.last_date()));

    assert!(default_cutoff(&series, 90).is_err());
}

#[test]
fn test_cutoff_before_an_earlier_end() {
    let cutoff = cutoff_before(ymd(2023, 1, 1), ymd(2023, 2, 22), 30).unwrap();
    assert_eq!(cutoff, ymd(2023, 1, 23));

    assert!(cutoff_before(ymd(2023, 1, 1), ymd(2023, 1, 20), 30).is_err());
}

#[test]
fn test_forecast_accuracy() {
    let forecast = vec![100.0, 110.0, 120.0];
    let actual = vec![102.0, 108.0, 123.0];

    let accuracy = forecast_accuracy(&forecast, &actual).unwrap();

    assert_relative_eq!(accuracy.mae, 7.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(accuracy.mse, 17.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(accuracy.rmse, (17.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    assert_relative_eq!(accuracy.bias, 1.0, epsilon = 1e-12);
    assert!(accuracy.error_std_dev > 0.0);

    let text = accuracy.to_string();
    assert!(text.contains("RMSE"));
}

#[test]
fn test_forecast_accuracy_rejects_mismatch() {
    assert!(forecast_accuracy(&[1.0], &[1.0, 2.0]).is_err());
    assert!(forecast_accuracy(&[], &[]).is_err());
}
