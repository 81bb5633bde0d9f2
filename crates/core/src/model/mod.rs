mod icon;
mod identity;
mod ids;
mod progress;
mod snapshot;
mod subject;
mod topic;

pub use icon::{DEFAULT_ICON, IconKey};
pub use identity::{Identity, PartitionKey};
pub use ids::{SubjectId, TopicId};
pub use progress::ProgressLog;
pub use snapshot::SyllabusSnapshot;
pub use subject::{Subject, SubjectError};
pub use topic::{Topic, TopicError, TopicStatus};
