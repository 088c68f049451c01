//! Static code mappings for categorical domain variables.
//!
//! Each [`CodedVariable`] maps human-readable labels to the integer codes used by downstream
//! capacity mappings. Labels are unique within a variable; codes are not (`other` and
//! `unknown` share the `-1` sentinel).

use fhir::AdministrativeGender;
use std::fmt::Display;

/// A categorical variable with an ordered label -> code table.
#[derive(Debug)]
pub struct CodedVariable<L: 'static> {
    pub name: &'static str,
    pub mapping: &'static [(L, i32)],
}

impl<L: Copy + PartialEq + Display> CodedVariable<L> {
    /// Labels in declaration order.
    pub fn labels(&self) -> impl Iterator<Item = L> + '_ {
        self.mapping.iter().map(|(label, _)| *label)
    }

    /// Code for a typed label.
    pub fn code(&self, label: L) -> Option<i32> {
        self.mapping
            .iter()
            .find(|(candidate, _)| *candidate == label)
            .map(|(_, code)| *code)
    }

    /// Code for a label given as its display text.
    pub fn code_for_label(&self, text: &str) -> Option<i32> {
        self.mapping
            .iter()
            .find(|(candidate, _)| candidate.to_string() == text)
            .map(|(_, code)| *code)
    }
}

/// Codebook for the capacity mappings.
pub struct Capacity;

impl Capacity {
    pub const SEX: CodedVariable<AdministrativeGender> = CodedVariable {
        name: "sex",
        mapping: &[
            (AdministrativeGender::Male, 1),
            (AdministrativeGender::Female, 2),
            (AdministrativeGender::Other, -1),
            (AdministrativeGender::Unknown, -1),
        ],
    };

    /// Look a variable up by name.
    pub fn variable(name: &str) -> Option<&'static CodedVariable<AdministrativeGender>> {
        const VARIABLES: &[&CodedVariable<AdministrativeGender>] = &[&Capacity::SEX];
        VARIABLES.iter().copied().find(|v| v.name == name)
    }
}
