use ecosim_lib::{PopulationEntry, RunConfig, Runner, SimConfig, TerminationStrategy};

#[allow(dead_code)]
pub struct SimBuilder {
    config: SimConfig,
}

#[allow(dead_code)]
impl SimBuilder {
    pub fn new() -> Self {
        let mut config = SimConfig::default();
        config.run = RunConfig {
            termination: TerminationStrategy::RunTillEventsExhausted,
            max_time: 300.0,
            report_interval: 25.0,
            algae_spores: false,
        };
        Self { config }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.kernel.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut SimConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_population(mut self, species: &str, count: usize) -> Self {
        self.config
            .population
            .push(PopulationEntry::new(species, count));
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn build(self) -> anyhow::Result<Runner> {
        Runner::from_config(&self.config, &[])
    }
}
