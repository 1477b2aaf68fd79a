use prometheus::{Encoder, Histogram, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub dispatches_total: IntCounterVec,
    pub ticket_transitions_total: IntCounterVec,
    pub dispatch_distance_km: Histogram,
    pub tickets_open: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let dispatches_total = IntCounterVec::new(
            Opts::new("dispatches_total", "Dispatch decisions by outcome"),
            &["outcome"],
        )
        .expect("valid dispatches_total metric");

        let ticket_transitions_total = IntCounterVec::new(
            Opts::new(
                "ticket_transitions_total",
                "Ticket state transitions by type and outcome",
            ),
            &["transition", "outcome"],
        )
        .expect("valid ticket_transitions_total metric");

        let dispatch_distance_km = Histogram::with_opts(
            prometheus::HistogramOpts::new(
                "dispatch_distance_km",
                "Distance in km between ticket and the assigned technician",
            )
            .buckets(vec![0.5, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 500.0]),
        )
        .expect("valid dispatch_distance_km metric");

        let tickets_open = IntGauge::new("tickets_open", "Tickets currently awaiting a technician")
            .expect("valid tickets_open metric");

        registry
            .register(Box::new(dispatches_total.clone()))
            .expect("register dispatches_total");
        registry
            .register(Box::new(ticket_transitions_total.clone()))
            .expect("register ticket_transitions_total");
        registry
            .register(Box::new(dispatch_distance_km.clone()))
            .expect("register dispatch_distance_km");
        registry
            .register(Box::new(tickets_open.clone()))
            .expect("register tickets_open");

        Self {
            registry,
            dispatches_total,
            ticket_transitions_total,
            dispatch_distance_km,
            tickets_open,
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
