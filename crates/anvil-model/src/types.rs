use std::fmt;

use serde::{Deserialize, Serialize};

/// A Java reference type: fully qualified name plus type parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JavaType {
    fqn: String,
    type_parameters: Vec<JavaType>,
}

impl JavaType {
    pub fn new(fqn: impl Into<String>) -> Self {
        Self {
            fqn: fqn.into(),
            type_parameters: Vec::new(),
        }
    }

    pub fn parameterized(fqn: impl Into<String>, type_parameters: Vec<JavaType>) -> Self {
        Self {
            fqn: fqn.into(),
            type_parameters,
        }
    }

    pub fn fully_qualified_name(&self) -> &str {
        &self.fqn
    }

    pub fn simple_name(&self) -> &str {
        self.fqn.rsplit('.').next().unwrap_or(&self.fqn)
    }

    pub fn package(&self) -> &str {
        match self.fqn.rfind('.') {
            Some(dot) => &self.fqn[..dot],
            None => "",
        }
    }

    pub fn type_parameters(&self) -> &[JavaType] {
        &self.type_parameters
    }

    /// The raw (unparameterized) form of this type.
    pub fn erased(&self) -> JavaType {
        JavaType::new(self.fqn.clone())
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fqn)?;
        if !self.type_parameters.is_empty() {
            f.write_str("<")?;
            for (i, param) in self.type_parameters.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                param.fmt(f)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl From<&str> for JavaType {
    fn from(fqn: &str) -> Self {
        Self::new(fqn)
    }
}

/// The name of a Java member (method, field, property).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JavaSymbol(String);

impl JavaSymbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bean-style accessor name for this property name (`foo` → `getFoo`).
    pub fn getter(&self) -> JavaSymbol {
        JavaSymbol(format!("get{}", capitalize(&self.0)))
    }

    /// Bean-style mutator name for this property name (`foo` → `setFoo`).
    pub fn setter(&self) -> JavaSymbol {
        JavaSymbol(format!("set{}", capitalize(&self.0)))
    }
}

impl fmt::Display for JavaSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for JavaSymbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
