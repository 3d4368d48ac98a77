// Copyright (c) 2025 - Cowboy AI, Inc.
//! CloudFormation Template Rendering
//!
//! Turns a [`StackDeclaration`] into the JSON template a provisioning engine
//! consumes. Object keys are emitted in sorted order, so equal declarations
//! render to byte-identical text.

use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::StackResult;
use crate::stack::resources::Resource;
use crate::stack::StackDeclaration;

/// Template format version
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// Deletion and replacement policy of every declared resource
pub const DELETION_POLICY: &str = "Delete";

/// Render the declaration as a template document
pub fn render(declaration: &StackDeclaration) -> StackResult<Value> {
    let mut resources = Map::new();
    for declared in &declaration.resources {
        let mut entry = Map::new();
        entry.insert("Type".to_string(), json!(declared.resource.cfn_type()));
        entry.insert("Properties".to_string(), declared.resource.properties()?);

        entry.insert("DeletionPolicy".to_string(), json!(DELETION_POLICY));
        entry.insert("UpdateReplacePolicy".to_string(), json!(DELETION_POLICY));

        if !declared.depends_on.is_empty() {
            entry.insert("DependsOn".to_string(), json!(declared.depends_on));
        }

        if let Resource::SearchDomain(domain) = &declared.resource {
            if domain.enable_version_upgrade {
                entry.insert(
                    "UpdatePolicy".to_string(),
                    json!({ "EnableVersionUpgrade": true }),
                );
            }
        }

        resources.insert(declared.logical_id.clone(), Value::Object(entry));
    }

    let mut outputs = Map::new();
    for output in &declaration.outputs {
        outputs.insert(
            output.logical_id.clone(),
            json!({
                "Description": output.description,
                "Value": serde_json::to_value(&output.value)?,
                "Export": { "Name": output.export_name },
            }),
        );
    }

    let mut deployment = Map::new();
    deployment.insert("Region".to_string(), json!(declaration.region));
    if let Some(account) = &declaration.account {
        deployment.insert("Account".to_string(), json!(account));
    }

    Ok(json!({
        "AWSTemplateFormatVersion": TEMPLATE_FORMAT_VERSION,
        "Description": declaration.description,
        "Metadata": { "Deployment": deployment },
        "Resources": resources,
        "Outputs": outputs,
    }))
}

/// Render the declaration as indented JSON text
pub fn render_pretty(declaration: &StackDeclaration) -> StackResult<String> {
    Ok(serde_json::to_string_pretty(&render(declaration)?)?)
}

/// File name used for the synthesized template
pub fn template_file_name(declaration: &StackDeclaration) -> String {
    format!("{}.template.json", declaration.stack_name)
}

/// Write `<stackName>.template.json` into `dir`, creating it if needed
pub fn write_template(declaration: &StackDeclaration, dir: impl AsRef<Path>) -> StackResult<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(template_file_name(declaration));
    let mut text = render_pretty(declaration)?;
    text.push('\n');
    std::fs::write(&path, text)?;
    info!("Wrote template to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TagSet;
    use crate::stack::resources::{Expr, LogGroup};

    fn declaration() -> StackDeclaration {
        let mut declaration =
            StackDeclaration::new("dev-us-east-1-Stack", "Test stack", "us-east-1", None);
        let group = declaration
            .add_resource(
                "app-dev-Logs",
                Resource::LogGroup(LogGroup {
                    retention_in_days: 30,
                    tags: TagSet::new(),
                }),
            )
            .unwrap();
        declaration
            .add_output(
                "app-dev-Logs-Arn-Output",
                Expr::get_att(&group, "Arn"),
                "app-dev-Logs-Arn",
                "Log group ARN",
            )
            .unwrap();
        declaration
    }

    #[test]
    fn test_render_structure() {
        let template = render(&declaration()).unwrap();
        assert_eq!(template["AWSTemplateFormatVersion"], "2010-09-09");
        assert_eq!(template["Description"], "Test stack");

        let logs = &template["Resources"]["appdevLogs"];
        assert_eq!(logs["Type"], "AWS::Logs::LogGroup");
        assert_eq!(logs["DeletionPolicy"], "Delete");
        assert_eq!(logs["UpdateReplacePolicy"], "Delete");
        assert_eq!(logs["Properties"]["RetentionInDays"], 30);
        assert!(logs.get("DependsOn").is_none());

        let output = &template["Outputs"]["appdevLogsArnOutput"];
        assert_eq!(output["Export"]["Name"], "app-dev-Logs-Arn");
        assert_eq!(output["Value"], json!({"Fn::GetAtt": ["appdevLogs", "Arn"]}));
    }

    #[test]
    fn test_deployment_metadata() {
        let template = render(&declaration()).unwrap();
        assert_eq!(
            template["Metadata"],
            json!({"Deployment": {"Region": "us-east-1"}})
        );

        let mut with_account = declaration();
        with_account.account = Some("123456789012".to_string());
        assert_eq!(
            render(&with_account).unwrap()["Metadata"]["Deployment"],
            json!({"Region": "us-east-1", "Account": "123456789012"})
        );
    }

    #[test]
    fn test_template_file_name() {
        assert_eq!(
            template_file_name(&declaration()),
            "dev-us-east-1-Stack.template.json"
        );
    }

    #[test]
    fn test_write_template() {
        let dir = std::env::temp_dir().join(format!("os-stack-template-{}", std::process::id()));
        let path = write_template(&declaration(), &dir).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("}\n"));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, render(&declaration()).unwrap());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
