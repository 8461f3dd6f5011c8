//! Cross-indicator alignment: composites that chain several kernels must
//! produce outputs that line up with each other and with the kernels run
//! standalone over the matching sub-ranges.

use ta_engine::prelude::*;

fn close_series(n: usize) -> Vec<f64> {
    let mut v = Vec::with_capacity(n);
    let mut price = 100.0_f64;
    for i in 0..n {
        price += (i as f64 * 0.713).sin() * 1.7 + 0.05;
        v.push(price);
    }
    v
}

fn full(n: usize) -> IndexRange {
    resolve_range(RangeSpec::full(), &[n]).unwrap()
}

#[test]
fn macd_histogram_is_line_minus_signal() {
    let n = 80;
    let data = close_series(n);
    let settings = Settings::new();
    let mut macd = vec![0.0; n];
    let mut signal = vec![0.0; n];
    let mut hist = vec![0.0; n];

    let r = macd_into(
        &data, full(n), 12, 26, 9, &settings, &mut macd, &mut signal, &mut hist,
    )
    .unwrap();
    assert_eq!((r.first, r.len), (33, 47));
    for i in 0..r.len {
        assert!((hist[i] - (macd[i] - signal[i])).abs() < 1e-9);
    }
}

#[test]
fn macd_line_matches_standalone_emas() {
    let n = 100;
    let data = close_series(n);
    let settings = Settings::new();
    let mut macd = vec![0.0; n];
    let mut signal = vec![0.0; n];
    let mut hist = vec![0.0; n];

    let r = macd_into(
        &data, full(n), 12, 26, 9, &settings, &mut macd, &mut signal, &mut hist,
    )
    .unwrap();

    // The line itself is EMA(12) - EMA(26) over the same bars.
    let mut fast = vec![0.0; n];
    let mut slow = vec![0.0; n];
    let rf = ema_into(&data, full(n), 12, &settings, &mut fast).unwrap();
    let rs = ema_into(&data, full(n), 26, &settings, &mut slow).unwrap();
    for i in 0..r.len {
        let bar = r.first + i;
        let line = fast[bar - rf.first] - slow[bar - rs.first];
        assert!((macd[i] - line).abs() < 1e-9, "bar {bar}");
    }
}

#[test]
fn apo_matches_standalone_moving_averages() {
    let n = 60;
    let data = close_series(n);
    let settings = Settings::new();
    let mut apo = vec![0.0; n];
    let r = apo_into(&data, full(n), 5, 12, MaKind::Sma, &settings, &mut apo).unwrap();

    let mut fast = vec![0.0; n];
    let mut slow = vec![0.0; n];
    let rf = sma_into(&data, full(n), 5, &mut fast).unwrap();
    let rs = sma_into(&data, full(n), 12, &mut slow).unwrap();
    assert_eq!(r.first, rs.first);
    for i in 0..r.len {
        let bar = r.first + i;
        let expected = fast[bar - rf.first] - slow[bar - rs.first];
        assert!((apo[i] - expected).abs() < 1e-9);
    }
}

#[test]
fn ppo_is_apo_scaled_by_slow_average() {
    let n = 60;
    let data = close_series(n);
    let settings = Settings::new();
    let mut apo = vec![0.0; n];
    let mut ppo = vec![0.0; n];
    let ra = apo_into(&data, full(n), 5, 12, MaKind::Sma, &settings, &mut apo).unwrap();
    let rp = ppo_into(&data, full(n), 5, 12, MaKind::Sma, &settings, &mut ppo).unwrap();
    assert_eq!(ra, rp);

    let mut slow = vec![0.0; n];
    let rs = sma_into(&data, full(n), 12, &mut slow).unwrap();
    for i in 0..ra.len {
        let bar = ra.first + i;
        let expected = apo[i] / slow[bar - rs.first] * 100.0;
        assert!((ppo[i] - expected).abs() < 1e-9);
    }
}

#[test]
fn adxr_averages_adx_with_its_lagged_value() {
    let n = 140;
    let close = close_series(n);
    let high: Vec<f64> = close.iter().map(|c| c + 1.2).collect();
    let low: Vec<f64> = close.iter().map(|c| c - 0.9).collect();
    let settings = Settings::new();
    let period = 14;

    let mut adx = vec![0.0; n];
    let mut adxr = vec![0.0; n];
    let ra = adx_into(&high, &low, &close, full(n), period, &settings, &mut adx).unwrap();
    let rr = adxr_into(&high, &low, &close, full(n), period, &settings, &mut adxr).unwrap();
    assert_eq!(rr.first, ra.first + period - 1);

    for i in 0..rr.len {
        let bar = rr.first + i;
        let current = adx[bar - ra.first];
        let lagged = adx[bar - ra.first - (period - 1)];
        assert!((adxr[i] - (current + lagged) / 2.0).abs() < 1e-9);
    }
}

#[test]
fn stoch_slow_k_equals_fast_d_smoothing_of_raw_k() {
    // Slow %K with SMA smoothing is fast %D with the same period.
    let n = 90;
    let close = close_series(n);
    let high: Vec<f64> = close.iter().map(|c| c + 0.8).collect();
    let low: Vec<f64> = close.iter().map(|c| c - 0.8).collect();
    let settings = Settings::new();

    let mut slow_k = vec![0.0; n];
    let mut slow_d = vec![0.0; n];
    let rs = stoch_into(
        &high, &low, &close, full(n), 5, 3, MaKind::Sma, 3, MaKind::Sma, &settings, &mut slow_k,
        &mut slow_d,
    )
    .unwrap();

    let mut fast_k = vec![0.0; n];
    let mut fast_d = vec![0.0; n];
    let rf = stoch_fast_into(
        &high, &low, &close, full(n), 5, 3, MaKind::Sma, &settings, &mut fast_k, &mut fast_d,
    )
    .unwrap();

    for i in 0..rs.len {
        let bar = rs.first + i;
        assert!((slow_k[i] - fast_d[bar - rf.first]).abs() < 1e-9);
    }
}

#[test]
fn stochrsi_matches_fast_stoch_over_rsi_output() {
    let n = 120;
    let data = close_series(n);
    let settings = Settings::new();

    let mut k = vec![0.0; n];
    let mut d = vec![0.0; n];
    let r = stochrsi_into(
        &data, full(n), 14, 14, 3, MaKind::Sma, &settings, &mut k, &mut d,
    )
    .unwrap();
    assert_eq!(r.first, 29);

    // Recompute by hand: RSI of the whole series, then fast stochastic of
    // the RSI values treated as high, low, and close at once.
    let mut rsi = vec![0.0; n];
    let rr = rsi_into(&data, full(n), 14, &settings, &mut rsi).unwrap();
    let rsi = &rsi[..rr.len];
    let mut k2 = vec![0.0; rr.len];
    let mut d2 = vec![0.0; rr.len];
    let r2 = stoch_fast_into(
        rsi,
        rsi,
        rsi,
        full(rr.len),
        14,
        3,
        MaKind::Sma,
        &settings,
        &mut k2,
        &mut d2,
    )
    .unwrap();
    assert_eq!(r.len, r2.len);
    for i in 0..r.len {
        assert!((k[i] - k2[i]).abs() < 1e-9);
        assert!((d[i] - d2[i]).abs() < 1e-9);
    }
}

#[test]
fn bollinger_middle_band_is_the_sma() {
    let n = 50;
    let data = close_series(n);
    let mut upper = vec![0.0; n];
    let mut middle = vec![0.0; n];
    let mut lower = vec![0.0; n];
    let r = bollinger_into(
        &data, full(n), 20, 2.0, 2.0, &mut upper, &mut middle, &mut lower,
    )
    .unwrap();

    let mut sma = vec![0.0; n];
    let rs = sma_into(&data, full(n), 20, &mut sma).unwrap();
    assert_eq!(r, rs);
    for i in 0..r.len {
        assert!((middle[i] - sma[i]).abs() < 1e-9);
        // Bands are symmetric around the middle for equal multipliers.
        assert!((upper[i] - middle[i] + lower[i] - middle[i]).abs() < 1e-9);
    }
}

#[test]
fn sub_range_output_matches_tail_of_full_range() {
    // Computing over a trailing sub-range must reproduce the tail of the
    // full-range output once the warm-up has converged. SMA and WMA are
    // exact; windowed functions carry no unstable history.
    let n = 100;
    let data = close_series(n);
    let mut full_out = vec![0.0; n];
    let mut tail_out = vec![0.0; n];

    let rf = sma_into(&data, full(n), 10, &mut full_out).unwrap();
    let tail = resolve_range(RangeSpec::new(60, 99), &[n]).unwrap();
    let rt = sma_into(&data, tail, 10, &mut tail_out).unwrap();
    assert_eq!((rt.first, rt.len), (60, 40));
    for i in 0..rt.len {
        let bar = rt.first + i;
        assert!((tail_out[i] - full_out[bar - rf.first]).abs() < 1e-12);
    }

    let rf = wma_into(&data, full(n), 10, &mut full_out).unwrap();
    let rt = wma_into(&data, tail, 10, &mut tail_out).unwrap();
    for i in 0..rt.len {
        let bar = rt.first + i;
        assert!((tail_out[i] - full_out[bar - rf.first]).abs() < 1e-9);
    }
}
