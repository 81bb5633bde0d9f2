use chrono::NaiveDate;

use crate::model::icon::IconKey;
use crate::model::ids::{SubjectId, TopicId};
use crate::model::progress::ProgressLog;
use crate::model::subject::Subject;
use crate::model::topic::{Topic, TopicStatus};

/// The whole state for one identity partition: the ordered subject list
/// plus the progress-history log.
///
/// All mutations are synchronous and either apply completely or leave
/// the snapshot untouched; an unknown subject or topic id is a no-op.
/// Derived values (stats, trend buckets) are never stored here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyllabusSnapshot {
    subjects: Vec<Subject>,
    history: ProgressLog,
}

impl SyllabusSnapshot {
    #[must_use]
    pub fn new(subjects: Vec<Subject>, history: ProgressLog) -> Self {
        Self { subjects, history }
    }

    /// The fixed starter syllabus used when a partition has no persisted
    /// data: four subjects, every topic `NotStarted`, empty log.
    #[must_use]
    pub fn starter() -> Self {
        let subjects = vec![
            starter_subject(
                "General Intelligence & Reasoning",
                "BrainIcon",
                &[
                    "Analogies",
                    "Classification",
                    "Series (Verbal and Non-Verbal)",
                    "Coding-Decoding",
                    "Syllogism",
                    "Blood Relations",
                    "Venn Diagrams",
                    "Problem Solving",
                ],
            ),
            starter_subject(
                "Quantitative Aptitude",
                "CalculatorIcon",
                &[
                    "Number Systems",
                    "Percentages",
                    "Ratio and Proportion",
                    "Profit and Loss",
                    "Time and Work",
                    "Time, Speed, and Distance",
                    "Algebra",
                    "Geometry",
                    "Trigonometry",
                ],
            ),
            starter_subject(
                "General Awareness",
                "BookOpenIcon",
                &[
                    "History (Ancient, Medieval, Modern)",
                    "Geography (Indian and World)",
                    "Polity and Constitution",
                    "Economics",
                    "Static GK (Awards, Books, etc.)",
                    "Current Affairs (Last 6 months)",
                    "General Science (Physics, Chemistry, Biology)",
                ],
            ),
            starter_subject(
                "English Comprehension",
                "MessageSquareIcon",
                &[
                    "Reading Comprehension",
                    "Vocabulary (Synonyms, Antonyms, Idioms)",
                    "Grammar (Error Spotting, Fill in the blanks)",
                    "Sentence Improvement",
                    "Active/Passive Voice",
                    "Direct/Indirect Speech",
                    "Para Jumbles",
                    "Cloze Test",
                ],
            ),
        ];

        Self {
            subjects,
            history: ProgressLog::new(),
        }
    }

    // Accessors
    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    #[must_use]
    pub fn history(&self) -> &ProgressLog {
        &self.history
    }

    #[must_use]
    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|subject| subject.id() == id)
    }

    fn subject_mut(&mut self, id: SubjectId) -> Option<&mut Subject> {
        self.subjects.iter_mut().find(|subject| subject.id() == id)
    }

    /// Appends a subject at the end of the list.
    pub fn add_subject(&mut self, subject: Subject) {
        self.subjects.push(subject);
    }

    /// Appends a topic to the named subject, preserving order.
    ///
    /// Returns `false` (no-op) when the subject id is unknown.
    pub fn add_topic(&mut self, subject_id: SubjectId, topic: Topic) -> bool {
        match self.subject_mut(subject_id) {
            Some(subject) => {
                subject.push_topic(topic);
                true
            }
            None => false,
        }
    }

    /// Removes a topic from the named subject.
    ///
    /// The progress-history log is deliberately left untouched: it
    /// records point-in-time transitions, not current composition.
    /// Returns `false` (no-op) when subject or topic is unknown.
    pub fn delete_topic(&mut self, subject_id: SubjectId, topic_id: TopicId) -> bool {
        self.subject_mut(subject_id)
            .and_then(|subject| subject.remove_topic(topic_id))
            .is_some()
    }

    /// Sets a topic's status and attributes the net completion change to
    /// the entry for `today`.
    ///
    /// A transition into `Completed` adds 1 to today's count, a
    /// transition out of `Completed` subtracts 1 (floored at 0);
    /// transitions between `NotStarted` and `InProgress` never touch the
    /// log. Returns `false` when nothing changed (unknown ids, or
    /// `new_status` equals the current status), in which case the
    /// snapshot is bit-for-bit untouched.
    pub fn update_topic_status(
        &mut self,
        subject_id: SubjectId,
        topic_id: TopicId,
        new_status: TopicStatus,
        today: NaiveDate,
    ) -> bool {
        let Some(topic) = self
            .subject_mut(subject_id)
            .and_then(|subject| subject.topic_mut(topic_id))
        else {
            return false;
        };

        let old_status = topic.status();
        if old_status == new_status {
            return false;
        }
        topic.set_status(new_status);

        let mut delta = 0;
        if new_status == TopicStatus::Completed {
            delta += 1;
        }
        if old_status == TopicStatus::Completed {
            delta -= 1;
        }
        if delta != 0 {
            self.history.apply(today, delta);
        }
        true
    }
}

fn starter_subject(name: &str, icon: &str, topics: &[&str]) -> Subject {
    let mut subject = Subject::new(SubjectId::new_random(), name, IconKey::new(icon))
        .expect("starter subject names are non-empty");
    for topic in topics {
        subject.push_topic(
            Topic::new(TopicId::new_random(), *topic).expect("starter topic names are non-empty"),
        );
    }
    subject
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
