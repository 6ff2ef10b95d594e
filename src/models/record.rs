use std::collections::HashMap;

/// Artifact sequence left behind by latin-1/UTF-8 double encoding in the
/// upstream data feed. Stripped from every textual field before layout.
pub const ENCODING_ARTIFACT: &str = "\u{c2}";

/// The canonical label fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Customer,
    Order,
    Content,
    Owner,
    Creator,
    Revision,
    Position,
    Mail,
    QrData,
}

impl FieldKey {
    pub const ALL: [FieldKey; 9] = [
        FieldKey::Customer,
        FieldKey::Order,
        FieldKey::Content,
        FieldKey::Owner,
        FieldKey::Creator,
        FieldKey::Revision,
        FieldKey::Position,
        FieldKey::Mail,
        FieldKey::QrData,
    ];

    /// Canonical key name as it appears in request payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::Customer => "customer",
            FieldKey::Order => "order",
            FieldKey::Content => "content",
            FieldKey::Owner => "owner",
            FieldKey::Creator => "creator",
            FieldKey::Revision => "revision",
            FieldKey::Position => "position",
            FieldKey::Mail => "mail",
            FieldKey::QrData => "qr_data",
        }
    }

    /// Match an input key, case-insensitively, accepting common aliases.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "customer" => Some(FieldKey::Customer),
            "order" => Some(FieldKey::Order),
            "content" | "contents" => Some(FieldKey::Content),
            "owner" => Some(FieldKey::Owner),
            "creator" => Some(FieldKey::Creator),
            "revision" => Some(FieldKey::Revision),
            "position" => Some(FieldKey::Position),
            "mail" | "email" => Some(FieldKey::Mail),
            "qr_data" | "qr" => Some(FieldKey::QrData),
            _ => None,
        }
    }
}

/// Values substituted for absent fields, resolved once at normalization.
#[derive(Debug, Clone)]
pub struct FieldDefaults {
    pub customer: String,
    pub order: String,
    pub content: String,
    pub owner: String,
    pub creator: String,
    pub revision: String,
    pub position: String,
    pub mail: String,
    /// Placeholder encoded into the QR when no payload is supplied.
    pub qr_data: String,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            customer: "Unknown Customer".to_string(),
            order: "Unknown Order".to_string(),
            content: String::new(),
            owner: "Default Owner".to_string(),
            creator: "Default Creator".to_string(),
            revision: "R0".to_string(),
            position: String::new(),
            mail: "dispatch@example.com".to_string(),
            qr_data: "UNSPECIFIED".to_string(),
        }
    }
}

impl FieldDefaults {
    pub fn value(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::Customer => &self.customer,
            FieldKey::Order => &self.order,
            FieldKey::Content => &self.content,
            FieldKey::Owner => &self.owner,
            FieldKey::Creator => &self.creator,
            FieldKey::Revision => &self.revision,
            FieldKey::Position => &self.position,
            FieldKey::Mail => &self.mail,
            FieldKey::QrData => &self.qr_data,
        }
    }
}

/// One fully resolved label. Every field holds its final string value;
/// absent inputs were already replaced by defaults, so rendering never
/// needs to consult a fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    pub customer: String,
    pub order: String,
    pub content: String,
    pub owner: String,
    pub creator: String,
    pub revision: String,
    pub position: String,
    pub mail: String,
    pub qr_data: String,
}

impl LabelRecord {
    /// Build a record from a raw key/value mapping. Unknown keys are
    /// ignored; known keys win over defaults even when their value is
    /// empty (presence-or-default, not presence-and-non-empty).
    pub fn from_fields(fields: &HashMap<String, String>, defaults: &FieldDefaults) -> Self {
        let resolve = |key: FieldKey| -> String {
            fields
                .iter()
                .find(|(name, _)| FieldKey::from_key(name) == Some(key))
                .map(|(_, value)| value.trim().to_string())
                .unwrap_or_else(|| defaults.value(key).to_string())
        };

        Self {
            customer: resolve(FieldKey::Customer),
            order: resolve(FieldKey::Order),
            content: resolve(FieldKey::Content),
            owner: resolve(FieldKey::Owner),
            creator: resolve(FieldKey::Creator),
            revision: resolve(FieldKey::Revision),
            position: resolve(FieldKey::Position),
            mail: resolve(FieldKey::Mail),
            qr_data: resolve(FieldKey::QrData),
        }
    }

    pub fn field(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::Customer => &self.customer,
            FieldKey::Order => &self.order,
            FieldKey::Content => &self.content,
            FieldKey::Owner => &self.owner,
            FieldKey::Creator => &self.creator,
            FieldKey::Revision => &self.revision,
            FieldKey::Position => &self.position,
            FieldKey::Mail => &self.mail,
            FieldKey::QrData => &self.qr_data,
        }
    }

    /// Title line: customer and order reference joined.
    pub fn title(&self) -> String {
        format!("{} {}", self.customer, self.order)
    }

    /// Copy of the record with the encoding artifact stripped from every
    /// textual field.
    pub fn sanitized(&self) -> Self {
        Self {
            customer: strip_artifacts(&self.customer),
            order: strip_artifacts(&self.order),
            content: strip_artifacts(&self.content),
            owner: strip_artifacts(&self.owner),
            creator: strip_artifacts(&self.creator),
            revision: strip_artifacts(&self.revision),
            position: strip_artifacts(&self.position),
            mail: strip_artifacts(&self.mail),
            qr_data: strip_artifacts(&self.qr_data),
        }
    }
}

/// Remove the corruption artifact; no other character is altered.
pub fn strip_artifacts(value: &str) -> String {
    value.replace(ENCODING_ARTIFACT, "")
}
