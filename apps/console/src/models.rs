use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Columns of the `Activity List` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Code,
    Group,
    Category,
    Name,
    AlternateName,
    RiskRating,
    IndustryRisk,
    ThirdParty,
    When,
    Notes,
    Flag,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::Code,
        Column::Group,
        Column::Category,
        Column::Name,
        Column::AlternateName,
        Column::RiskRating,
        Column::IndustryRisk,
        Column::ThirdParty,
        Column::When,
        Column::Notes,
        Column::Flag,
    ];

    pub fn db_name(self) -> &'static str {
        match self {
            Self::Code => "Code",
            Self::Group => "Group",
            Self::Category => "Category",
            Self::Name => "Activity Name",
            Self::AlternateName => "النشاط",
            Self::RiskRating => "Risk Rating",
            Self::IndustryRisk => "Industry Risk",
            Self::ThirdParty => "Third Party",
            Self::When => "When",
            Self::Notes => "Notes",
            Self::Flag => "DNFBP",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Code => "Code",
            Self::Group => "Group",
            Self::Category => "Category",
            Self::Name => "Activity Name",
            Self::AlternateName => "Arabic Name",
            Self::RiskRating => "Risk Rating",
            Self::IndustryRisk => "Industry Risk",
            Self::ThirdParty => "Third Party",
            Self::When => "When",
            Self::Notes => "Notes",
            Self::Flag => "DNFBP",
        }
    }

    /// Resolves a backend column name, quoted or bare.
    pub fn from_db_name(raw: &str) -> Option<Self> {
        let name = raw.trim().trim_matches('"').trim();
        Self::ALL
            .into_iter()
            .find(|column| column.db_name().eq_ignore_ascii_case(name))
    }

    /// Group codes are numeric, so searching them is an exact match.
    pub fn is_exact_match(self) -> bool {
        matches!(self, Self::Group)
    }

    /// Optional columns render a visible placeholder when empty.
    pub fn shows_placeholder(self) -> bool {
        matches!(
            self,
            Self::ThirdParty | Self::When | Self::Notes | Self::RiskRating | Self::Flag
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "Code", default, deserialize_with = "lenient_text")]
    pub code: String,
    #[serde(rename = "Group", default, deserialize_with = "lenient_text")]
    pub group: String,
    #[serde(rename = "Category", default, deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(rename = "Activity Name", default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(rename = "النشاط", default, deserialize_with = "lenient_text")]
    pub alternate_name: String,
    #[serde(rename = "Risk Rating", default, deserialize_with = "lenient_text")]
    pub risk_rating: String,
    #[serde(rename = "Industry Risk", default, deserialize_with = "lenient_text")]
    pub industry_risk: String,
    #[serde(rename = "Third Party", default, deserialize_with = "lenient_text")]
    pub third_party: String,
    #[serde(rename = "When", default, deserialize_with = "lenient_text")]
    pub approval_timing: String,
    #[serde(rename = "Notes", default, deserialize_with = "lenient_text")]
    pub notes: String,
    #[serde(rename = "DNFBP", default, deserialize_with = "lenient_text")]
    pub flag: String,
}

impl Activity {
    pub fn field(&self, column: Column) -> &str {
        match column {
            Column::Code => &self.code,
            Column::Group => &self.group,
            Column::Category => &self.category,
            Column::Name => &self.name,
            Column::AlternateName => &self.alternate_name,
            Column::RiskRating => &self.risk_rating,
            Column::IndustryRisk => &self.industry_risk,
            Column::ThirdParty => &self.third_party,
            Column::When => &self.approval_timing,
            Column::Notes => &self.notes,
            Column::Flag => &self.flag,
        }
    }

    pub fn field_mut(&mut self, column: Column) -> &mut String {
        match column {
            Column::Code => &mut self.code,
            Column::Group => &mut self.group,
            Column::Category => &mut self.category,
            Column::Name => &mut self.name,
            Column::AlternateName => &mut self.alternate_name,
            Column::RiskRating => &mut self.risk_rating,
            Column::IndustryRisk => &mut self.industry_risk,
            Column::ThirdParty => &mut self.third_party,
            Column::When => &mut self.approval_timing,
            Column::Notes => &mut self.notes,
            Column::Flag => &mut self.flag,
        }
    }
}

/// The backend mixes text, numeric and null cells; everything is read as text.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(other) => other.to_string(),
    })
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActivityPage {
    pub rows: Vec<Activity>,
    pub total_count: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStage {
    Pre,
    Post,
    NotRequired,
}

impl ApprovalStage {
    pub const ALL: [ApprovalStage; 3] = [Self::Pre, Self::Post, Self::NotRequired];

    pub fn label(self) -> &'static str {
        match self {
            Self::Pre => "Pre",
            Self::Post => "Post",
            Self::NotRequired => "Not required",
        }
    }

    /// `None` means the stage is absent in the backend (a null `When`).
    pub fn backend_value(self) -> Option<&'static str> {
        match self {
            Self::Pre => Some("Pre"),
            Self::Post => Some("Post"),
            Self::NotRequired => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRating {
    Low,
    Medium,
    High,
    HighOverride,
}

impl RiskRating {
    pub const ALL: [RiskRating; 4] = [Self::Low, Self::Medium, Self::High, Self::HighOverride];

    /// Ratings allowed while fast-track mode is on.
    pub const FAST_TRACK: [RiskRating; 2] = [Self::Low, Self::Medium];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::HighOverride => "High-Override",
        }
    }

    pub fn backend_value(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::HighOverride => "Override",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_mixed_cell_types() {
        let raw = r#"{
            "Code": "4711-01",
            "Group": 4711,
            "Category": null,
            "Activity Name": "Coffee shop",
            "DNFBP": false
        }"#;
        let activity: Activity = serde_json::from_str(raw).unwrap();
        assert_eq!(activity.code, "4711-01");
        assert_eq!(activity.group, "4711");
        assert_eq!(activity.category, "");
        assert_eq!(activity.flag, "false");
        assert_eq!(activity.third_party, "");
    }

    #[test]
    fn resolves_quoted_and_spaced_column_names() {
        assert_eq!(Column::from_db_name("\"Activity Name\""), Some(Column::Name));
        assert_eq!(Column::from_db_name("Third Party"), Some(Column::ThirdParty));
        assert_eq!(Column::from_db_name("code"), Some(Column::Code));
        assert_eq!(Column::from_db_name("النشاط"), Some(Column::AlternateName));
        assert_eq!(Column::from_db_name("Unknown"), None);
    }

    #[test]
    fn high_override_maps_to_backend_override() {
        assert_eq!(RiskRating::HighOverride.backend_value(), "Override");
        assert_eq!(RiskRating::High.backend_value(), "High");
        assert_eq!(ApprovalStage::NotRequired.backend_value(), None);
    }
}
