use std::collections::BTreeSet;

use crate::metastore::{KsqlTopic, SerdeOption, SourceName};

/// The sink a query writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Into {
    name: SourceName,
    topic: KsqlTopic,
    create: bool,
    default_serde_options: BTreeSet<SerdeOption>,
}

impl Into {
    /// `create` is true when the sink does not exist yet and must be created.
    /// The serde options are copied into an owned set, so order and
    /// duplicates in the input are irrelevant.
    pub fn new(
        name: SourceName,
        create: bool,
        topic: KsqlTopic,
        default_serde_options: impl IntoIterator<Item = SerdeOption>,
    ) -> Self {
        Self {
            name,
            topic,
            create,
            default_serde_options: default_serde_options.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &SourceName {
        &self.name
    }

    pub fn is_create(&self) -> bool {
        self.create
    }

    pub fn topic(&self) -> &KsqlTopic {
        &self.topic
    }

    pub fn default_serde_options(&self) -> &BTreeSet<SerdeOption> {
        &self.default_serde_options
    }
}
