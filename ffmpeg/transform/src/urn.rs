/*!
    Diagnostic identifiers for engine queues.
*/

use std::fmt;

/**
    Identifies the queue (and worker thread) of one engine instance in
    logs and thread names.

    Rendered as `application/stream/part/name`, e.g.
    `live/camera1/trs/filter_video`.
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueueUrn {
    application: String,
    stream: String,
    part: String,
    name: String,
}

impl QueueUrn {
    pub fn new(
        application: impl Into<String>,
        stream: impl Into<String>,
        part: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            application: application.into(),
            stream: stream.into(),
            part: part.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QueueUrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.application, self.stream, self.part, self.name
        )
    }
}
