use serde::Deserialize;
use std::fmt;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SkyCondition {
    #[default]
    Cloudless,
    Scattered,
    Broken,
    Overcast,
}

impl SkyCondition {
    pub const ALL: [SkyCondition; 4] = [
        SkyCondition::Cloudless,
        SkyCondition::Scattered,
        SkyCondition::Broken,
        SkyCondition::Overcast,
    ];

    /// Position of the condition in lookup tables ordered cloudless to overcast
    pub fn index(self) -> usize {
        match self {
            SkyCondition::Cloudless => 0,
            SkyCondition::Scattered => 1,
            SkyCondition::Broken => 2,
            SkyCondition::Overcast => 3,
        }
    }
}

impl fmt::Display for SkyCondition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            SkyCondition::Cloudless => "cloudless",
            SkyCondition::Scattered => "scattered clouds",
            SkyCondition::Broken => "broken clouds",
            SkyCondition::Overcast => "overcast",
        };
        write!(f, "{}", name)
    }
}
