use serde::{Deserialize, Serialize};

/// Remarks shown on a submit page when the author gives none.
pub const DEFAULT_SUBMIT_REMARKS: &str =
    "This is the last page. Click 'Submit' to send your answers.";

/// One `<page>` of a questionnaire. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    pub sections: Vec<Section>,
    pub submit: bool,
    pub submit_remarks: String,
}

impl Page {
    /// All questions on the page, in document order across sections.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections
            .iter()
            .flat_map(|section| section.content.iter())
            .filter_map(|block| match block {
                SectionContent::Questions(block) => Some(block.questions.iter()),
                SectionContent::Markdown(_) => None,
            })
            .flatten()
    }
}

/// A horizontal row of width-allocated blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub content: Vec<SectionContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SectionContent {
    Markdown(MarkdownBlock),
    Questions(QuestionsBlock),
}

impl SectionContent {
    pub fn width(&self) -> i32 {
        match self {
            SectionContent::Markdown(block) => block.width,
            SectionContent::Questions(block) => block.width,
        }
    }
}

/// Author prose rendered to HTML. `content` is `None` when the element had
/// no text, which is distinct from rendered-but-empty output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkdownBlock {
    pub content: Option<String>,
    pub width: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionsBlock {
    pub questions: Vec<Question>,
    pub width: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Choices,
    Numeric,
    Decimal,
    #[default]
    Text,
    Markdown,
}

impl QuestionType {
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "choices" => Some(Self::Choices),
            "numeric" => Some(Self::Numeric),
            "decimal" => Some(Self::Decimal),
            "text" => Some(Self::Text),
            "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Choices => "choices",
            Self::Numeric => "numeric",
            Self::Decimal => "decimal",
            Self::Text => "text",
            Self::Markdown => "markdown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub text: String,
    pub name: String,
    pub required: bool,
    pub choices: Vec<Choice>,
    pub allow_multiple: bool,
    /// NaN when the author set no lower bound.
    #[serde(with = "bound")]
    pub min_value: f64,
    /// NaN when the author set no upper bound.
    #[serde(with = "bound")]
    pub max_value: f64,
}

impl Question {
    pub fn min_bound(&self) -> Option<f64> {
        (!self.min_value.is_nan()).then_some(self.min_value)
    }

    pub fn max_bound(&self) -> Option<f64> {
        (!self.max_value.is_nan()).then_some(self.max_value)
    }

    pub fn choice(&self, value: &str) -> Option<&Choice> {
        self.choices.iter().find(|choice| choice.value == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub text: String,
    pub other: bool,
}

/// An unset bound is NaN in memory and `null` on the wire.
mod bound {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}
