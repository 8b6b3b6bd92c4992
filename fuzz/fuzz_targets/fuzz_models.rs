#![no_main]

use libfuzzer_sys::fuzz_target;

use multifit_core::registry::{DefaultFactory, ModelerFactory};
use multifit_core::series::Series;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let horizon = usize::from(data[0] % 64);
    let values: Vec<f64> = data[1..]
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
        .collect();
    let series = Series::new("fuzz", values);

    let factory = DefaultFactory::new();
    for name in factory.available() {
        let Ok(modeler) = factory.get(name) else {
            continue;
        };
        // Either a finite forecast of the requested length or an error.
        if let Ok(forecast) = modeler.fit_predict(&series, horizon) {
            assert_eq!(forecast.horizon(), horizon);
            assert!(forecast.values().iter().all(|v| v.is_finite()));
        }
    }
});
