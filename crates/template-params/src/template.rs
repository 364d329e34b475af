//! Template document types and JSON parsing.
//!
//! Only the parts of a template that parameter processing touches are typed:
//! the parameter list and the container environment blocks inside pods and
//! replication controllers. Every other field is carried through untouched
//! in flattened JSON maps, and services stay opaque.

use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TemplateError;

/// A template parameter.
///
/// Generation only fires for a parameter whose `value` is empty and whose
/// `generate` expression is not.
///
/// # Example
///
/// ```
/// use template_params::Parameter;
///
/// let parameter = Parameter::new("ADMIN_PASSWORD").with_generate("[a-zA-Z0-9]{8}");
///
/// assert!(parameter.needs_generation());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Name referenced by `${NAME}` placeholders.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Declared value type, informational only.
    #[serde(rename = "type", default)]
    pub parameter_type: String,
    /// Expression describing how to generate the value.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub generate: String,
    /// Resolved or user-supplied value.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

impl Parameter {
    /// Creates a parameter with the given name and no value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the generate expression.
    #[must_use]
    pub fn with_generate(mut self, generate: impl Into<String>) -> Self {
        self.generate = generate.into();
        self
    }

    /// Sets the value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Returns `true` when the value is still to be generated.
    #[must_use]
    pub fn needs_generation(&self) -> bool {
        self.value.is_empty() && !self.generate.is_empty()
    }
}

/// A name/value pair in a container's environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    /// Variable name.
    pub name: String,
    /// Variable value, possibly holding `${NAME}` placeholders.
    #[serde(default)]
    pub value: String,
}

/// A container definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    /// Environment variables passed to the container.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    /// Remaining container fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The container manifest of a pod.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerManifest {
    /// Containers in the pod.
    #[serde(default)]
    pub containers: Vec<Container>,
    /// Remaining manifest fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Desired state of a pod.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodState {
    /// The container manifest.
    #[serde(default)]
    pub manifest: ContainerManifest,
    /// Remaining state fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A pod definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    /// Desired state holding the container manifest.
    #[serde(default)]
    pub desired_state: PodState,
    /// Remaining pod fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The pod template of a replication controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodTemplate {
    /// Desired state of the templated pods.
    #[serde(default)]
    pub desired_state: PodState,
    /// Remaining pod template fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Desired state of a replication controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationControllerState {
    /// Template for the replicated pods.
    #[serde(default)]
    pub pod_template: PodTemplate,
    /// Remaining state fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A replication controller definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationController {
    /// Desired controller state.
    #[serde(default)]
    pub desired_state: ReplicationControllerState,
    /// Remaining controller fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A parameterised deployment template.
///
/// # Example
///
/// ```
/// use template_params::TemplateConfig;
///
/// let json = r#"{
///     "id": "guestbook",
///     "parameters": [{"name": "ADMIN_USERNAME", "generate": "admin[A-Z0-9]{3}"}]
/// }"#;
///
/// let template = TemplateConfig::from_json(json).expect("valid template");
/// assert_eq!(template.id, "guestbook");
/// assert!(template.parameter("ADMIN_USERNAME").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    /// Template identifier.
    #[serde(default)]
    pub id: String,
    /// Time the template was created through storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    /// Template name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Template description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Declared parameters, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Services, carried through unchanged.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<Value>,
    /// Pods whose container environments are substituted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pods: Vec<Pod>,
    /// Replication controllers whose pod template environments are substituted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replication_controllers: Vec<ReplicationController>,
    /// Remaining template fields such as `kind`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TemplateConfig {
    /// Parses a template from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::ParseError`] if the JSON is malformed or a
    /// typed field has the wrong shape.
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        serde_json::from_str(json).map_err(|e| TemplateError::ParseError {
            message: e.to_string(),
        })
    }

    /// Loads a template from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let io_error = |message: String| TemplateError::IoError {
            path: path.to_path_buf(),
            message,
        };
        let parent = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .ok_or_else(|| io_error("template path must be a file".to_owned()))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|e| io_error(e.to_string()))?;
        let contents = dir
            .read_to_string(Path::new(file_name))
            .map_err(|e| io_error(e.to_string()))?;

        Self::from_json(&contents)
    }

    /// Serialises the template as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::SerializeError`] if serialisation fails.
    pub fn to_json_pretty(&self) -> Result<String, TemplateError> {
        serde_json::to_string_pretty(self).map_err(|e| TemplateError::SerializeError {
            message: e.to_string(),
        })
    }

    /// Finds a parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Finds a parameter by name for modification.
    pub fn parameter_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.parameters.iter_mut().find(|p| p.name == name)
    }

    /// Adds a caller-supplied parameter.
    ///
    /// A parameter with the same name is replaced in place, keeping its
    /// position; otherwise the parameter is appended.
    pub fn add_custom_parameter(&mut self, parameter: Parameter) {
        if let Some(existing) = self.parameter_mut(&parameter.name) {
            *existing = parameter;
            return;
        }
        self.parameters.push(parameter);
    }

    /// Iterates over every container environment that substitution scans.
    pub(crate) fn env_blocks_mut(&mut self) -> impl Iterator<Item = &mut Vec<EnvVar>> {
        let pod_manifests = self
            .pods
            .iter_mut()
            .map(|pod| &mut pod.desired_state.manifest);
        let controller_manifests = self.replication_controllers.iter_mut().map(|controller| {
            &mut controller
                .desired_state
                .pod_template
                .desired_state
                .manifest
        });

        pod_manifests
            .chain(controller_manifests)
            .flat_map(|manifest| manifest.containers.iter_mut())
            .map(|container| &mut container.env)
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    const GUESTBOOK_JSON: &str = r#"{
        "kind": "templateConfig",
        "id": "guestbook",
        "name": "guestbook",
        "parameters": [
            {"name": "ADMIN_USERNAME", "description": "Guestbook administrator username",
             "type": "string", "generate": "admin[A-Z0-9]{3}"},
            {"name": "REDIS_PASSWORD", "description": "Redis password",
             "type": "string", "generate": "[a-zA-Z0-9]{8}"}
        ],
        "services": [{"kind": "Service", "id": "frontend", "port": 5432}],
        "pods": [{
            "kind": "Pod",
            "id": "redis-master-2",
            "desiredState": {
                "manifest": {
                    "version": "v1beta1",
                    "containers": [{
                        "name": "master",
                        "image": "dockerfile/redis",
                        "env": [{"name": "REDIS_PASSWORD", "value": "${REDIS_PASSWORD}"}]
                    }]
                },
                "restartpolicy": {}
            }
        }],
        "replicationControllers": [{
            "kind": "ReplicationController",
            "id": "frontendController",
            "desiredState": {
                "replicas": 3,
                "podTemplate": {
                    "desiredState": {
                        "manifest": {
                            "containers": [{
                                "name": "php-redis",
                                "env": [{"name": "ADMIN_USERNAME", "value": "${ADMIN_USERNAME}"}]
                            }]
                        }
                    },
                    "labels": {"name": "frontend"}
                }
            }
        }]
    }"#;

    #[fixture]
    fn guestbook() -> TemplateConfig {
        TemplateConfig::from_json(GUESTBOOK_JSON).expect("valid template")
    }

    #[rstest]
    fn parses_typed_and_untyped_fields(guestbook: TemplateConfig) {
        assert_eq!(guestbook.id, "guestbook");
        assert_eq!(guestbook.parameters.len(), 2);
        assert_eq!(guestbook.services.len(), 1);
        assert_eq!(guestbook.pods.len(), 1);
        assert_eq!(guestbook.replication_controllers.len(), 1);
        assert_eq!(
            guestbook.extra.get("kind"),
            Some(&Value::from("templateConfig"))
        );
    }

    #[rstest]
    fn round_trip_preserves_unknown_fields(guestbook: TemplateConfig) {
        let json = guestbook.to_json_pretty().expect("serialises");
        let reparsed = TemplateConfig::from_json(&json).expect("reparses");

        assert_eq!(guestbook, reparsed);
        assert!(json.contains("\"restartpolicy\""));
        assert!(json.contains("\"replicas\": 3"));
    }

    #[rstest]
    fn env_blocks_cover_pods_and_controllers(mut guestbook: TemplateConfig) {
        let names: Vec<String> = guestbook
            .env_blocks_mut()
            .flat_map(|env| env.iter().map(|var| var.name.clone()))
            .collect();

        assert_eq!(names, vec!["REDIS_PASSWORD", "ADMIN_USERNAME"]);
    }

    #[rstest]
    fn custom_parameter_is_appended_then_replaced(mut guestbook: TemplateConfig) {
        guestbook.add_custom_parameter(Parameter::new("CUSTOM_PARAM").with_value("1"));
        guestbook.add_custom_parameter(Parameter::new("CUSTOM_PARAM").with_value("2"));

        assert_eq!(guestbook.parameters.len(), 3);
        let custom = guestbook.parameter("CUSTOM_PARAM").expect("parameter added");
        assert_eq!(custom.value, "2");
    }

    #[rstest]
    fn custom_parameter_replaces_in_place(mut guestbook: TemplateConfig) {
        guestbook.add_custom_parameter(Parameter::new("ADMIN_USERNAME").with_value("root"));

        let first = guestbook.parameters.first().expect("parameters present");
        assert_eq!(first.name, "ADMIN_USERNAME");
        assert_eq!(first.value, "root");
        assert!(first.generate.is_empty());
    }

    #[rstest]
    #[case("not json")]
    #[case(r#"{"parameters": "nope"}"#)]
    #[case(r#"{"pods": [{"desiredState": {"manifest": {"containers": [{"env": [{"value": "x"}]}]}}}]}"#)]
    fn rejects_malformed_templates(#[case] json: &str) {
        let result = TemplateConfig::from_json(json);
        assert!(matches!(result, Err(TemplateError::ParseError { .. })));
    }

    #[rstest]
    #[case(Parameter::new("A").with_generate("password"), true)]
    #[case(Parameter::new("A").with_generate("password").with_value("x"), false)]
    #[case(Parameter::new("A"), false)]
    fn needs_generation_follows_value_and_generate(
        #[case] parameter: Parameter,
        #[case] expected: bool,
    ) {
        assert_eq!(parameter.needs_generation(), expected);
    }

    #[test]
    fn from_file_reports_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing.json");

        let result = TemplateConfig::from_file(&path);

        assert!(matches!(result, Err(TemplateError::IoError { .. })));
    }

    #[test]
    fn from_file_reads_template() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("template.json");
        std::fs::write(&path, GUESTBOOK_JSON).expect("write template");

        let template = TemplateConfig::from_file(&path).expect("loads");

        assert_eq!(template.id, "guestbook");
    }
}
