/// Stored row for one feed source. `id` is derived from `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub id: String,
    pub url: String,
    pub title: String,
    pub link: String,
    pub description: String,
}
