//! Request descriptors
//!
//! A descriptor captures one logical HTTP call: where it goes and, if it
//! carries a payload, what is posted. The method is implied by the payload.

use bytes::Bytes;
use url::form_urlencoded;

/// Ordered form fields.
///
/// Insertion order is preserved, so `a=1&b=2` stays `a=1&b=2` once encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    /// Create an empty field list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.push(name, value);
        self
    }

    /// Append a field in place
    pub fn push(&mut self, name: impl Into<String>, value: impl ToString) {
        self.0.push((name.into(), value.to_string()));
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when there are no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as `application/x-www-form-urlencoded`.
    pub fn url_encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in self.iter() {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for FormFields
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }
}

impl<K, V> From<Vec<(K, V)>> for FormFields
where
    K: Into<String>,
    V: ToString,
{
    fn from(fields: Vec<(K, V)>) -> Self {
        fields.into_iter().collect()
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for FormFields
where
    K: Into<String>,
    V: ToString,
{
    fn from(fields: [(K, V); N]) -> Self {
        fields.into_iter().collect()
    }
}

/// Payload posted with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyPayload {
    /// Field mapping, sent as multipart or url-encoded form data
    Form(FormFields),
    /// Opaque bytes, always transmitted verbatim
    Raw(Bytes),
}

impl BodyPayload {
    /// `true` when there is nothing to post
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Form(fields) => fields.is_empty(),
            Self::Raw(bytes) => bytes.is_empty(),
        }
    }

    /// `true` for [`BodyPayload::Raw`]
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}

/// One logical HTTP call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestDescriptor {
    /// Bodyless request
    Plain {
        /// Target URL
        url: String,
    },
    /// Request carrying a payload
    WithBody {
        /// Target URL
        url: String,
        /// Posted payload
        body: BodyPayload,
    },
}

impl RequestDescriptor {
    /// Bodyless request to `url`
    pub fn plain(url: impl Into<String>) -> Self {
        Self::Plain { url: url.into() }
    }

    /// Form post to `url`
    pub fn form(url: impl Into<String>, fields: impl Into<FormFields>) -> Self {
        Self::WithBody {
            url: url.into(),
            body: BodyPayload::Form(fields.into()),
        }
    }

    /// Raw post to `url`
    pub fn raw(url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self::WithBody {
            url: url.into(),
            body: BodyPayload::Raw(body.into()),
        }
    }

    /// Bodyless request whose query string carries `fields`.
    ///
    /// Empty fields leave the URL untouched. An existing query is extended
    /// with `&` rather than opened a second time.
    pub fn query(url: impl Into<String>, fields: &FormFields) -> Self {
        let mut url = url.into();
        if !fields.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&fields.url_encode());
        }
        Self::Plain { url }
    }

    /// Target URL
    pub fn url(&self) -> &str {
        match self {
            Self::Plain { url } | Self::WithBody { url, .. } => url,
        }
    }

    /// Payload to post, if any.
    ///
    /// Empty payloads count as absent: the request goes out as a GET.
    pub fn body(&self) -> Option<&BodyPayload> {
        match self {
            Self::WithBody { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }

    /// `true` when the payload must be sent verbatim
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::WithBody { body, .. } if body.is_raw())
    }
}

impl From<&str> for RequestDescriptor {
    fn from(url: &str) -> Self {
        Self::plain(url)
    }
}

impl From<String> for RequestDescriptor {
    fn from(url: String) -> Self {
        Self::plain(url)
    }
}

/// Ordered set of descriptors; position is the correlation key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchRequest {
    requests: Vec<RequestDescriptor>,
}

impl BatchRequest {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor; returns its index
    pub fn push(&mut self, descriptor: impl Into<RequestDescriptor>) -> usize {
        self.requests.push(descriptor.into());
        self.requests.len() - 1
    }

    /// Number of descriptors
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// `true` when the batch holds nothing
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Descriptor at `index`
    pub fn get(&self, index: usize) -> Option<&RequestDescriptor> {
        self.requests.get(index)
    }

    /// Iterate over `(index, descriptor)` in submission order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &RequestDescriptor)> {
        self.requests.iter().enumerate()
    }
}

impl From<&str> for BatchRequest {
    fn from(url: &str) -> Self {
        Self {
            requests: vec![RequestDescriptor::plain(url)],
        }
    }
}

impl From<String> for BatchRequest {
    fn from(url: String) -> Self {
        Self {
            requests: vec![RequestDescriptor::plain(url)],
        }
    }
}

impl From<RequestDescriptor> for BatchRequest {
    fn from(descriptor: RequestDescriptor) -> Self {
        Self {
            requests: vec![descriptor],
        }
    }
}

impl<T: Into<RequestDescriptor>> From<Vec<T>> for BatchRequest {
    fn from(requests: Vec<T>) -> Self {
        requests.into_iter().collect()
    }
}

impl<T: Into<RequestDescriptor>> FromIterator<T> for BatchRequest {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            requests: iter.into_iter().map(Into::into).collect(),
        }
    }
}
