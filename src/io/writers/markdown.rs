use std::io::Write;

use crate::analysis::ConsolidatedArchitecture;
use crate::io::output::OutputWriter;

/// Markdown report of the architecture proposal.
pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_architecture(
        &mut self,
        architecture: &ConsolidatedArchitecture,
    ) -> anyhow::Result<()> {
        let mut out = String::new();
        out.push_str("# Propuesta de Descomposición\n\n");

        let metadata = &architecture.project_metadata;
        out.push_str("## Proyecto\n\n");
        out.push_str(&format!(
            "- Componentes: {}\n- Líneas de código: {}\n- Componentes con secretos: {}\n- Dominio compartido: `{}`\n\n",
            metadata.total_components,
            metadata.total_loc,
            metadata.components_with_secrets,
            metadata.shared_domain
        ));

        if !architecture.proposals.is_empty() {
            out.push_str("## Propuestas\n\n");
            out.push_str("| Id | Nombre | Viabilidad | Componentes | Acoplamiento ext. | Sensible |\n");
            out.push_str("|----|--------|------------|-------------|-------------------|----------|\n");
            for proposal in &architecture.proposals {
                out.push_str(&format!(
                    "| {} | {} | {} | {} | {:.2} | {} |\n",
                    proposal.id,
                    proposal.name,
                    proposal.viability.label(),
                    proposal.metrics.size,
                    proposal.metrics.external_coupling,
                    if proposal.metrics.sensitive { "sí" } else { "no" }
                ));
            }
            out.push('\n');

            for proposal in &architecture.proposals {
                out.push_str(&format!("### {} (id {})\n\n", proposal.name, proposal.id));
                for line in &proposal.rationale {
                    if line.is_empty() {
                        out.push('\n');
                    } else {
                        out.push_str(&format!("- {line}\n"));
                    }
                }
                out.push('\n');
                out.push_str("Acciones recomendadas:\n\n");
                for action in &proposal.recommended_actions {
                    out.push_str(&format!("- {action}\n"));
                }
                out.push('\n');
            }
        }

        if !architecture.support_libraries.is_empty() {
            out.push_str("## Librerías de Soporte\n\n");
            for library in &architecture.support_libraries {
                out.push_str(&format!(
                    "- **{}** (id {}): {} componente(s)\n",
                    library.name,
                    library.id,
                    library.components.len()
                ));
            }
            out.push('\n');
        }

        self.writer.write_all(out.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ProjectMetadata;
    use std::collections::BTreeMap;

    #[test]
    fn renders_project_section() {
        let architecture = ConsolidatedArchitecture {
            project_metadata: ProjectMetadata {
                external_dependencies: BTreeMap::new(),
                package_dependencies: BTreeMap::new(),
                total_components: 2,
                total_loc: 10,
                components_with_secrets: 1,
                shared_domain: "com.shop".to_string(),
            },
            proposals: Vec::new(),
            support_libraries: Vec::new(),
            summary: String::new(),
        };

        let mut buffer = Vec::new();
        MarkdownWriter::new(&mut buffer)
            .write_architecture(&architecture)
            .unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("# Propuesta de Descomposición"));
        assert!(text.contains("`com.shop`"));
    }
}
