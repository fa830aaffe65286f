//! Project tree: assemblies of components, backgrounds and material sets.

use objconf::{NamedContainer, introspect};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MaterialItem {
    pub name: String,
}

introspect! {
    MaterialItem {
        name,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ComponentItem {
    pub name: String,
}

introspect! {
    ComponentItem {
        name,
    }
}

impl ComponentItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AssemblyItem {
    pub name: String,
    pub components: NamedContainer<ComponentItem>,
}

introspect! {
    AssemblyItem {
        name,
        components: [Expandable],
    }
}

impl Default for AssemblyItem {
    fn default() -> Self {
        Self::new("Assembly", [])
    }
}

impl AssemblyItem {
    pub fn new(
        name: impl Into<String>,
        components: impl IntoIterator<Item = ComponentItem>,
    ) -> Self {
        Self {
            name: name.into(),
            components: NamedContainer::with_items("Components", components),
        }
    }
}

/// Two-colour gradient fill.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Gradient {
    /// Start colour, a CSS colour name or `#rrggbb`.
    pub from: String,
    /// End colour.
    pub to: String,
}

introspect! {
    Gradient {
        from: [DisplayName("Color 1")],
        to: [DisplayName("Color 2")],
    }
}

/// A scene background. Plain backgrounds have no gradient.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BackgroundItem {
    pub name: String,
    pub gradient: Option<Gradient>,
}

introspect! {
    BackgroundItem {
        name,
        gradient: [Category("Appearance")],
    }
}

/// Root of a project file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ProjectItem {
    pub name: String,
    pub assemblies: NamedContainer<AssemblyItem>,
    pub backgrounds: NamedContainer<BackgroundItem>,
    pub material_sets: NamedContainer<NamedContainer<MaterialItem>>,
}

introspect! {
    ProjectItem {
        name,
        assemblies: [Expandable],
        backgrounds: [Expandable],
        material_sets: [Expandable, DisplayName("Material Sets")],
    }
}

impl Default for ProjectItem {
    fn default() -> Self {
        Self::new("Project")
    }
}

impl ProjectItem {
    /// A project with the sample assemblies and background.
    pub fn new(name: impl Into<String>) -> Self {
        let mut next = 0;
        let mut components = |count: usize| {
            (0..count)
                .map(|_| {
                    next += 1;
                    ComponentItem::new(format!("Component {next}"))
                })
                .collect::<Vec<_>>()
        };
        let assemblies = [3, 2, 1]
            .into_iter()
            .enumerate()
            .map(|(i, count)| AssemblyItem::new(format!("Assembly {}", i + 1), components(count)))
            .collect::<Vec<_>>();

        Self {
            name: name.into(),
            assemblies: NamedContainer::with_items("Assemblies", assemblies),
            backgrounds: NamedContainer::with_items(
                "Backgrounds",
                [BackgroundItem {
                    name: "Cool Blue".to_string(),
                    gradient: Some(Gradient {
                        from: "beige".to_string(),
                        to: "aqua".to_string(),
                    }),
                }],
            ),
            material_sets: NamedContainer::new("Material Sets"),
        }
    }
}
