//! Conversion of diagnostics to SARIF 2.1.0.

use engine::Diagnostic;
use loader::Severity;
use serde_sarif::sarif;

pub fn to_sarif(diagnostics: &[Diagnostic]) -> sarif::Sarif {
    let results: Vec<sarif::Result> = diagnostics
        .iter()
        .map(|d| {
            let location = sarif::Location::builder()
                .physical_location(
                    sarif::PhysicalLocation::builder()
                        .artifact_location(
                            sarif::ArtifactLocation::builder()
                                .uri(d.file.clone())
                                .build(),
                        )
                        .region(
                            sarif::Region::builder()
                                .start_line(d.line as i64)
                                .start_column(d.column as i64)
                                .build(),
                        )
                        .build(),
                )
                .build();

            let level = match d.severity {
                Severity::Warning => sarif::ResultLevel::Warning,
                Severity::Error => sarif::ResultLevel::Error,
            };

            sarif::Result::builder()
                .rule_id(format!("{}.{}", d.rule_id, d.code))
                .message(sarif::Message::builder().text(d.message.clone()).build())
                .level(level)
                .locations(vec![location])
                .build()
        })
        .collect();

    sarif::Sarif::builder()
        .version(serde_json::json!("2.1.0"))
        .schema(sarif::SCHEMA_URL.to_string())
        .runs(vec![sarif::Run::builder()
            .tool(
                sarif::Tool::builder()
                    .driver(sarif::ToolComponent::builder().name("wpsec").build())
                    .build(),
            )
            .results(results)
            .build()])
        .build()
}
