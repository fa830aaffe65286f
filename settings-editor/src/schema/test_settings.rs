//! Test procedures that can be run against a device under test (DUT).
//!
//! ```toml
//! name = "Settings"
//!
//! [tests]
//! name = "Tests"
//!
//! [[tests.items]]
//! name = "Diode Test"
//! ```

use std::time::Duration;

use objconf::{NamedContainer, introspect, introspect_enum};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind of quantity a controlled variable or reference device works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum VariableType {
    /// Gas mix concentration.
    #[default]
    GasConcentration,
    MassFlow,
    VolumeFlow,
    Velocity,
    Pressure,
    Temperature,
}

introspect_enum!(VariableType {
    GasConcentration,
    MassFlow,
    VolumeFlow,
    Velocity,
    Pressure,
    Temperature,
});

/// Non-measurement action executed during a test, such as switching a relay
/// or sending a calibration request to the DUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum Command {
    /// Remove power from the DUT.
    #[default]
    TurnOff,
    /// Apply power to the DUT.
    TurnOn,
    /// Restore factory settings.
    Default,
    /// Set range settings.
    Range,
    /// Zero calibration.
    Zero,
    /// Span calibration.
    Span,
}

introspect_enum!(Command {
    TurnOff,
    TurnOn,
    Default,
    Range,
    Zero,
    Span,
});

/// A variable held at a series of setpoints during a test component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TestControlledVariable {
    pub variable_type: VariableType,
    /// Error tolerance around setpoints, % full scale.
    pub error_tolerance: f64,
    /// Tolerated rate of change, % full scale per second.
    pub rate_tolerance: f64,
    /// Setpoints, % full scale.
    pub setpoints: NamedContainer<f64>,
    #[serde(with = "timespan")]
    #[schemars(with = "String")]
    pub stability_time: Duration,
    #[serde(with = "timespan")]
    #[schemars(with = "String")]
    pub timeout: Duration,
    /// Samples taken from the DUT at each setpoint.
    pub samples: u32,
    #[serde(with = "timespan")]
    #[schemars(with = "String")]
    pub interval: Duration,
}

// Controlled variables carry no name, so none of them ever become tree nodes;
// they are edited through the property sheet of their component.
introspect! {
    TestControlledVariable {
        variable_type: [
            Expandable,
            DisplayName("Variable Type"),
            Category("Test Variable"),
            Description("Type of the variable."),
        ],
        error_tolerance: [
            Expandable,
            DisplayName("Error Tolerance"),
            Category("Test Variable"),
            Description("Error tolerance around setpoints [% full scale]. If exceeded, Stability Time will reset."),
        ],
        rate_tolerance: [
            Expandable,
            DisplayName("Rate Tolerance"),
            Category("Test Variable"),
            Description("Tolerated rate of change of setpoints [% full scale / s]. If exceeded, Stability Time will reset."),
        ],
        setpoints: [
            Expandable,
            DisplayName("Setpoints"),
            Category("Test Variable"),
            Description("Setpoints [% full scale]."),
        ],
        stability_time: [
            Expandable,
            DisplayName("Stability Time"),
            Category("Test Variable"),
            Description("Required time to be at setpoint before continuing test."),
        ],
        timeout: [
            Expandable,
            DisplayName("Timeout"),
            Category("Test Variable"),
            Description("Timeout before aborting control."),
        ],
        samples: [
            Expandable,
            DisplayName("Samples"),
            Category("Test Component"),
            Description("Number of samples taken from DUT at each setpoint."),
        ],
        interval: [
            Expandable,
            DisplayName("Interval"),
            Category("Test Component"),
            Description("Time to wait between taking samples from DUT/variables."),
        ],
    }
}

impl Default for TestControlledVariable {
    fn default() -> Self {
        Self {
            variable_type: VariableType::default(),
            error_tolerance: 25.0,
            rate_tolerance: 2.0,
            setpoints: NamedContainer::new("Setpoints"),
            stability_time: Duration::ZERO,
            timeout: Duration::from_secs(30),
            samples: 0,
            interval: Duration::ZERO,
        }
    }
}

impl TestControlledVariable {
    /// A variable of `variable_type` held at `setpoints`, other fields at
    /// their defaults.
    pub fn at(variable_type: VariableType, setpoints: impl IntoIterator<Item = f64>) -> Self {
        Self {
            variable_type,
            setpoints: NamedContainer::with_items("Setpoints", setpoints),
            ..Self::default()
        }
    }

    fn sampled(mut self, samples: u32, interval: Duration) -> Self {
        self.samples = samples;
        self.interval = interval;
        self
    }
}

/// One step of a test.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TestComponent {
    pub name: String,
    pub commands: Option<NamedContainer<Command>>,
    pub controlled_variables: Option<NamedContainer<TestControlledVariable>>,
}

introspect! {
    TestComponent {
        name: [Category("Test Component"), Description("Name for this part of the test.")],
        commands: [
            Expandable,
            DisplayName("Commands"),
            Category("Test Component"),
            Description("Actions to perform on the DUT during this test component."),
        ],
        controlled_variables: [
            Expandable,
            DisplayName("Controlled Variables"),
            Category("Test Component"),
            Description("Controlled variables for this part of the test."),
        ],
    }
}

impl TestComponent {
    pub fn new(
        name: impl Into<String>,
        variables: impl IntoIterator<Item = TestControlledVariable>,
    ) -> Self {
        Self {
            name: name.into(),
            commands: None,
            controlled_variables: Some(NamedContainer::with_items(
                "Controlled Variables",
                variables,
            )),
        }
    }
}

/// A test that may be performed on a DUT.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TestSetting {
    pub name: String,
    pub components: Option<NamedContainer<TestComponent>>,
    pub references: Option<NamedContainer<VariableType>>,
}

introspect! {
    TestSetting {
        name: [
            Category("Test Settings"),
            Description("Name of the test (as it will appear to the operator)."),
        ],
        components: [
            Expandable,
            DisplayName("Components"),
            Category("Test Settings"),
            Description("Actions performed during the test."),
        ],
        references: [
            Expandable,
            DisplayName("References"),
            Category("Test Settings"),
            Description("Variables measured (with reference devices) during the test."),
        ],
    }
}

impl TestSetting {
    pub fn new(name: impl Into<String>, components: impl IntoIterator<Item = TestComponent>) -> Self {
        Self {
            name: name.into(),
            components: Some(NamedContainer::with_items("Components", components)),
            references: None,
        }
    }

    fn with_references(mut self, references: impl IntoIterator<Item = VariableType>) -> Self {
        self.references = Some(NamedContainer::with_items("References", references));
        self
    }
}

/// Root of the test settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TestSettings {
    pub name: String,
    pub tests: NamedContainer<TestSetting>,
}

introspect! {
    TestSettings {
        name,
        tests: [
            Expandable,
            Category("Test Settings"),
            Description("Settings describing tests that can be performed."),
        ],
    }
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            name: "Settings".to_string(),
            tests: NamedContainer::with_items(
                "Tests",
                [diode_test(), flow_rate_test(), warm_up_stability()],
            ),
        }
    }
}

/// Measure once per minute for 15 hours.
fn diode_test() -> TestSetting {
    TestSetting::new(
        "Diode Test",
        [TestComponent::new(
            "Measure",
            [TestControlledVariable::default().sampled(900, Duration::from_secs(60))],
        )],
    )
}

fn purge() -> TestComponent {
    TestComponent::new(
        "Purge",
        [
            TestControlledVariable::at(VariableType::MassFlow, [500.0]),
            TestControlledVariable {
                stability_time: Duration::from_secs(4 * 60),
                timeout: Duration::from_secs(10 * 60),
                interval: Duration::from_secs(1),
                ..TestControlledVariable::at(VariableType::GasConcentration, [0.0])
            },
        ],
    )
}

/// Alternate purges with flow steps of 100 to 500 sccm.
fn flow_rate_test() -> TestSetting {
    let mut components = Vec::new();
    for sccm in (100..=500).step_by(100) {
        components.push(purge());
        components.push(TestComponent::new(
            format!("{sccm} sccm"),
            [
                TestControlledVariable::at(VariableType::GasConcentration, [100.0]),
                TestControlledVariable::at(VariableType::MassFlow, [f64::from(sccm)])
                    .sampled(240, Duration::from_millis(500)),
            ],
        ));
    }
    components.push(purge());
    TestSetting::new("Flow Rate Test", components)
        .with_references([VariableType::MassFlow, VariableType::GasConcentration])
}

fn warm_up_stability() -> TestSetting {
    let mut apply_gas = TestComponent::new(
        "Apply gas",
        [TestControlledVariable::at(VariableType::GasConcentration, [50.0])],
    );
    apply_gas.commands = Some(NamedContainer::with_items("Commands", [Command::TurnOn]));
    TestSetting::new(
        "Warm-Up Stability",
        [
            apply_gas,
            TestComponent::new(
                "Measure stability",
                [TestControlledVariable::at(VariableType::GasConcentration, [50.0])
                    .sampled(3600, Duration::from_secs(1))],
            ),
        ],
    )
    .with_references([VariableType::GasConcentration])
}

/// Durations stored as `[d.]hh:mm:ss[.fraction]` text.
mod timespan {
    use std::time::Duration;

    use objconf::introspect::{format_duration, parse_duration};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_duration(&text).ok_or_else(|| D::Error::custom(format!("invalid duration {text:?}")))
    }
}

#[cfg(test)]
mod tests {
    use objconf::{Format, build_tree, codec, walk};

    use super::*;

    #[test]
    fn test_default_catalog_tree() {
        let settings = TestSettings::default();
        let tree = build_tree(&settings, "name").unwrap();
        assert_eq!(tree.label(), "Settings");
        let tests = &tree.children()[0];
        assert_eq!(tests.label(), "Tests");
        let names: Vec<_> = tests.children().iter().map(|c| c.label()).collect();
        assert_eq!(names, ["Diode Test", "Flow Rate Test", "Warm-Up Stability"]);

        let flow = tests.find("tests.1.components").unwrap();
        assert_eq!(flow.children().len(), 11);
        assert_eq!(flow.children()[1].label(), "100 sccm");
        assert_eq!(flow.children()[10].label(), "Purge");
    }

    #[test]
    fn test_controlled_variables_are_reported_not_shown() {
        let settings = TestSettings::default();
        let w = walk(&settings, "name");
        let variables = w
            .root
            .as_ref()
            .unwrap()
            .find("tests.0.components.0.controlled_variables")
            .unwrap();
        assert!(variables.children().is_empty());
        assert!(
            w.skipped
                .contains(&"tests.0.components.0.controlled_variables.0".to_string())
        );
        assert!(w.skipped.contains(&"tests.1.references.0".to_string()));
    }

    #[test]
    fn test_defaults() {
        let v = TestControlledVariable::default();
        assert_eq!(v.error_tolerance, 25.0);
        assert_eq!(v.rate_tolerance, 2.0);
        assert_eq!(v.timeout, Duration::from_secs(30));
        assert_eq!(v.setpoints.name(), "Setpoints");
        assert!(v.setpoints.is_empty());
    }

    #[test]
    fn test_durations_are_text() {
        let v = TestControlledVariable::at(VariableType::MassFlow, [1.0])
            .sampled(240, Duration::from_millis(500));
        let text = codec::encode(&v, Format::Toml).unwrap();
        assert!(text.contains("interval = \"00:00:00.5\""), "{text}");
        assert!(text.contains("timeout = \"00:00:30\""), "{text}");
        let back: TestControlledVariable = codec::decode(&text, Format::Toml).unwrap().unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_catalog_round_trips() {
        let settings = TestSettings::default();
        for format in [Format::Toml, Format::Json] {
            let text = codec::encode(&settings, format).unwrap();
            let back: TestSettings = codec::decode(&text, format).unwrap().unwrap();
            assert_eq!(back, settings);
        }
    }
}
