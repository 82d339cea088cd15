mod article;
mod feed;
mod site;

pub use article::Article;
pub use feed::{Channel, FeedDocument, FeedItem};
pub use site::Site;

use serde::{Deserialize, Serialize};

/// The two entity collections, named identically in the store and the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Sites,
    Articles,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Sites => "sites",
            Collection::Articles => "articles",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Projection pushed to the search index. Only these two fields are ever sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub title: String,
    pub description: String,
}

/// One logical record written to every sink.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Site(Site),
    Article(Article),
}

impl Entity {
    pub fn collection(&self) -> Collection {
        match self {
            Entity::Site(_) => Collection::Sites,
            Entity::Article(_) => Collection::Articles,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Entity::Site(site) => &site.id,
            Entity::Article(article) => &article.id,
        }
    }

    pub fn document(&self) -> IndexDocument {
        let (title, description) = match self {
            Entity::Site(site) => (&site.title, &site.description),
            Entity::Article(article) => (&article.title, &article.description),
        };
        IndexDocument {
            title: title.clone(),
            description: description.clone(),
        }
    }
}
