#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// The test could not be loaded; carries the backend's reason.
    TestUnavailable(String),
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::TestUnavailable(reason) if reason.is_empty() => {
                "This test could not be loaded.".to_string()
            }
            Self::TestUnavailable(reason) => format!("This test could not be loaded: {reason}"),
            Self::Unknown => "Something went wrong. Please try again.".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Error(ViewError),
}
