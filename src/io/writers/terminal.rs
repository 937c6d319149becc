use colored::Colorize;

use crate::analysis::{ConsolidatedArchitecture, Viability};
use crate::io::output::OutputWriter;

/// Colored console report: the consolidated summary plus one block per
/// proposal.
pub struct TerminalWriter;

impl TerminalWriter {
    pub fn new() -> Self {
        TerminalWriter
    }

    fn viability_label(viability: Viability) -> colored::ColoredString {
        match viability {
            Viability::Alta => "Alta".green().bold(),
            Viability::Media => "Media".yellow().bold(),
            Viability::Baja => "Baja".red().bold(),
        }
    }
}

impl Default for TerminalWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputWriter for TerminalWriter {
    fn write_architecture(
        &mut self,
        architecture: &ConsolidatedArchitecture,
    ) -> anyhow::Result<()> {
        println!("{}", architecture.summary);

        for proposal in &architecture.proposals {
            println!(
                "{} [{}] — viabilidad {} ({} componentes)",
                proposal.name.bold(),
                proposal.id,
                Self::viability_label(proposal.viability),
                proposal.metrics.size
            );
            for line in &proposal.rationale {
                println!("  {line}");
            }
            for action in &proposal.recommended_actions {
                println!("  {action}");
            }
            println!();
        }

        if !architecture.support_libraries.is_empty() {
            println!("{}", "Librerías de soporte:".bold());
            for library in &architecture.support_libraries {
                println!(
                    "  {} [{}] — {} componente(s)",
                    library.name,
                    library.id,
                    library.components.len()
                );
            }
        }

        Ok(())
    }
}
