use std::path::PathBuf;

use clap::Args;
use statqa_codebook::Variable;

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub struct ShowCodebookArg {
    /// Codebook file (.json, or the plain-text format otherwise)
    #[arg(long)]
    codebook: PathBuf,
    /// Emit the codebook as JSON instead of a listing
    #[arg(long)]
    json: bool,
}

pub fn run(arg: &ShowCodebookArg) -> anyhow::Result<()> {
    let codebook = util::load_codebook(&arg.codebook)?;
    if arg.json {
        Output::save_json(&codebook, None)?;
        return Ok(());
    }

    if let Some(name) = &codebook.name {
        println!("Codebook: {name}");
    }
    println!("{} variable(s)", codebook.len());
    for variable in &codebook.variables {
        println!("  {}", describe(variable));
    }
    Ok(())
}

fn describe(variable: &Variable) -> String {
    let mut line = format!("{} [{}]", variable.name, variable.semantic_type);
    if let Some(label) = &variable.label {
        line.push_str(&format!(" \"{label}\""));
    }
    if !variable.value_labels.is_empty() {
        line.push_str(&format!(", {} value label(s)", variable.value_labels.len()));
    }
    if !variable.missing_codes.is_empty() {
        line.push_str(&format!(
            ", {} missing code(s)",
            variable.missing_codes.len()
        ));
    }
    let roles: Vec<&str> = [
        (variable.is_treatment, "treatment"),
        (variable.is_outcome, "outcome"),
        (variable.is_confounder, "confounder"),
    ]
    .iter()
    .filter_map(|(flag, role)| flag.then_some(*role))
    .collect();
    if !roles.is_empty() {
        line.push_str(&format!(", role: {}", roles.join("+")));
    }
    line
}

#[cfg(test)]
mod tests {
    use statqa_codebook::{DataValue, SemanticType};

    use super::*;

    #[test]
    fn test_describe_lists_roles_and_labels() {
        let mut variable = Variable::new("program", SemanticType::Boolean)
            .with_label("Job Program")
            .with_missing_code(DataValue::Number(-1.0));
        variable.is_treatment = true;

        let line = describe(&variable);
        assert!(line.contains("program [boolean]"));
        assert!(line.contains("\"Job Program\""));
        assert!(line.contains("1 missing code(s)"));
        assert!(line.contains("role: treatment"));
    }
}
