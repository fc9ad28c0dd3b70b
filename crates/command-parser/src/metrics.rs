use crate::parser::ParseResult;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

#[derive(Clone)]
pub struct ParserMetrics {
    pub utterances: IntCounter,
    pub clauses: IntCounter,
    /// Unknown descriptors in final results. An utterance with nothing
    /// actionable counts once however many clauses it had.
    pub unknown_descriptors: IntCounter,
    pub tokens: IntCounter,
}

#[derive(Clone)]
pub struct MetricsHub {
    pub registry: Registry,
    pub parser: ParserMetrics,
}

impl MetricsHub {
    pub fn new() -> Result<Self, String> {
        let registry = Registry::new();
        let utterances = IntCounter::new("sr_parser_utterances", "Total utterances parsed")
            .map_err(|e| format!("metrics init error: {e}"))?;
        let clauses = IntCounter::new("sr_parser_clauses", "Total clauses classified")
            .map_err(|e| format!("metrics init error: {e}"))?;
        let unknown_descriptors = IntCounter::new(
            "sr_parser_unknown_descriptors",
            "Unknown descriptors in parse results",
        )
        .map_err(|e| format!("metrics init error: {e}"))?;
        let tokens = IntCounter::new("sr_parser_tokens", "Total instruction tokens lowered")
            .map_err(|e| format!("metrics init error: {e}"))?;
        let parser = ParserMetrics {
            utterances,
            clauses,
            unknown_descriptors,
            tokens,
        };
        register(&registry, &parser.utterances);
        register(&registry, &parser.clauses);
        register(&registry, &parser.unknown_descriptors);
        register(&registry, &parser.tokens);
        Ok(Self { registry, parser })
    }

    pub fn record(&self, result: &ParseResult, tokens: usize) {
        self.parser.utterances.inc();
        self.parser.clauses.inc_by(result.clauses.len() as u64);
        let unknown = result.descriptors.iter().filter(|d| d.is_unknown()).count();
        self.parser.unknown_descriptors.inc_by(unknown as u64);
        self.parser.tokens.inc_by(tokens as u64);
    }

    pub fn encode_text(&self) -> String {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buf) {
            return format!("error encoding metrics: {e}");
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

/// Register a counter; a failure is logged and the counter stays usable
/// but unexported.
fn register(registry: &Registry, counter: &IntCounter) -> bool {
    match registry.register(Box::new(counter.clone())) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "metric registration failed");
            false
        }
    }
}
