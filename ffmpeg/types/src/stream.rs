/*!
    Stream-level information shared by all tracks of one stream.
*/

/**
    Identity of a stream within its owning application.

    Only the names are carried here; they are used to build diagnostic
    identifiers for the queues and workers serving the stream's tracks.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamInfo {
    application_name: String,
    name: String,
}

impl StreamInfo {
    /**
        Create stream info for the given application and stream name.
    */
    pub fn new(application_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            name: name.into(),
        }
    }

    /**
        Name of the application that owns the stream.
    */
    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    /**
        Name of the stream.
    */
    pub fn name(&self) -> &str {
        &self.name
    }
}
