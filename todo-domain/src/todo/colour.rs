use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;
use std::fmt;
use todo_macros::value_object;

/// 清单颜色，仅允许受支持调色板中的取值
#[value_object(default = false)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    code: String,
}

impl Colour {
    pub const WHITE: &'static str = "#FFFFFF";
    pub const RED: &'static str = "#FF5733";
    pub const ORANGE: &'static str = "#FFC300";
    pub const YELLOW: &'static str = "#FFFF66";
    pub const GREEN: &'static str = "#CCFF99";
    pub const BLUE: &'static str = "#6666FF";
    pub const PURPLE: &'static str = "#9966CC";
    pub const GREY: &'static str = "#999999";

    const SUPPORTED: [&'static str; 8] = [
        Self::WHITE,
        Self::RED,
        Self::ORANGE,
        Self::YELLOW,
        Self::GREEN,
        Self::BLUE,
        Self::PURPLE,
        Self::GREY,
    ];

    /// 由颜色代码构造；不在调色板内的代码返回 `InvalidValue`
    pub fn from_code(code: &str) -> DomainResult<Self> {
        let colour = Colour {
            code: code.trim().to_ascii_uppercase(),
        };
        colour.validate()?;
        Ok(colour)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// 全部受支持的颜色
    pub fn supported() -> impl Iterator<Item = Colour> {
        Self::SUPPORTED.iter().map(|c| Colour {
            code: (*c).to_string(),
        })
    }
}

impl ValueObject for Colour {
    type Error = DomainError;

    fn validate(&self) -> Result<(), Self::Error> {
        if Self::SUPPORTED.contains(&self.code.as_str()) {
            Ok(())
        } else {
            Err(DomainError::invalid_value(format!(
                "unsupported colour: {}",
                self.code
            )))
        }
    }
}

impl Default for Colour {
    fn default() -> Self {
        Colour {
            code: Self::WHITE.to_string(),
        }
    }
}

impl TryFrom<String> for Colour {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Colour::from_code(&value)
    }
}

impl From<Colour> for String {
    fn from(value: Colour) -> Self {
        value.code
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
