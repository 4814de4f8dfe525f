use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub ride_requests_total: IntCounterVec,
    pub ride_transitions_total: IntCounterVec,
    pub available_drivers: IntGauge,
    pub settlement_amount: HistogramVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let ride_requests_total = IntCounterVec::new(
            Opts::new("ride_requests_total", "Ride requests by outcome"),
            &["outcome"],
        )
        .expect("valid ride_requests_total metric");

        let ride_transitions_total = IntCounterVec::new(
            Opts::new("ride_transitions_total", "Ride status transitions by target status"),
            &["status"],
        )
        .expect("valid ride_transitions_total metric");

        let available_drivers =
            IntGauge::new("available_drivers", "Registered drivers currently available")
                .expect("valid available_drivers metric");

        let settlement_amount = HistogramVec::new(
            HistogramOpts::new("settlement_amount", "Fare debited at ride completion")
                .buckets(vec![5.0, 7.5, 10.0, 15.0, 20.0, 30.0, 50.0]),
            &["outcome"],
        )
        .expect("valid settlement_amount metric");

        registry
            .register(Box::new(ride_requests_total.clone()))
            .expect("register ride_requests_total");
        registry
            .register(Box::new(ride_transitions_total.clone()))
            .expect("register ride_transitions_total");
        registry
            .register(Box::new(available_drivers.clone()))
            .expect("register available_drivers");
        registry
            .register(Box::new(settlement_amount.clone()))
            .expect("register settlement_amount");

        Self {
            registry,
            ride_requests_total,
            ride_transitions_total,
            available_drivers,
            settlement_amount,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
