// Copyright 2017 Dmitry Tantsur <divius.inside@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Various utilities.

/// Enumeration of string values used in the protocol.
///
/// Values not known to this crate are mapped to an extra `Unknown` variant.
macro_rules! protocol_enum {
    {$(#[$attr:meta])* enum $name:ident { $($(#[$iattr:meta])* $item:ident = $val:literal),+ }} => (
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Deserialize, ::serde::Serialize)]
        pub enum $name {
            $($(#[$iattr])* #[serde(rename = $val)] $item,)+
            #[doc = "Value not known to this client."]
            #[serde(other)]
            Unknown,
        }

        impl $name {
            /// String representation used by the API.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$item => $val,)+
                    $name::Unknown => "Unknown",
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    );
}

pub mod url {
    //! Handy primitives for working with URLs.

    use reqwest::Url;

    use crate::{Error, ErrorKind, Result};

    /// Parse a URL that can be used as a base for other URLs.
    pub fn parse_base(value: &str) -> Result<Url> {
        let url = Url::parse(value).map_err(|e| {
            Error::new(ErrorKind::InvalidInput, format!("Invalid URL {}: {}", value, e))
        })?;
        if url.cannot_be_a_base() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("URL {} cannot be used as a base", value),
            ));
        }
        Ok(url)
    }

    /// Append path segments to a URL.
    pub fn extend<'s, I>(mut url: Url, segments: I) -> Result<Url>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let _ = url
            .path_segments_mut()
            .map_err(|_| Error::new(ErrorKind::InvalidInput, "Invalid URL: wrong schema?"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
