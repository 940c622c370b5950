// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Flow paths, session cookie naming, and agreement type catalog seed data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agreement Studio

//! Constants shared between the core models and the server crate.

/// Browser-facing flow paths, in step order
pub mod paths {
    /// Landing page
    pub const LANDING: &str = "/";
    /// Agreement type selection
    pub const SELECT: &str = "/select/";
    /// Conversational reflection
    pub const REFLECTION: &str = "/reflection/";
    /// Review and edit of the generated text
    pub const REVIEW: &str = "/review/";
    /// Print and sign
    pub const PRINT: &str = "/print/";
    /// Signing photo capture
    pub const PHOTO: &str = "/photo/";
    /// Completion view
    pub const COMPLETE: &str = "/complete/";
    /// Chat API
    pub const API_CHAT: &str = "/api/chat/";
    /// Generation API
    pub const API_GENERATE: &str = "/api/generate/";
    /// Staff archive listing
    pub const ARCHIVE: &str = "/archive/";
    /// Staff single-record view
    pub const ARCHIVE_ENTRY: &str = "/archive/:id/";
}

/// Session cookie settings
pub mod session {
    /// Cookie carrying the agreement session token
    pub const COOKIE_NAME: &str = "agreement_session";
}

/// Photo storage layout
pub mod photos {
    /// Directory under the media root holding signing photos
    pub const UPLOAD_DIR: &str = "signing_photos";
    /// File name prefix for captured photos
    pub const FILE_PREFIX: &str = "signing";
    /// Largest accepted decoded photo, in bytes
    pub const MAX_PHOTO_BYTES: usize = 12 * 1024 * 1024;
    /// Accepted MIME types and the extension each is stored under
    pub const ALLOWED_TYPES: &[(&str, &str)] = &[
        ("image/jpeg", "jpg"),
        ("image/jpg", "jpg"),
        ("image/png", "png"),
        ("image/webp", "webp"),
        ("image/gif", "gif"),
        ("image/heic", "heic"),
    ];

    /// Canonical MIME type and extension for `mime`, if it is an accepted image
    #[must_use]
    pub fn image_type(mime: &str) -> Option<(&'static str, &'static str)> {
        let mime = mime.split(';').next().unwrap_or_default().trim();
        ALLOWED_TYPES
            .iter()
            .find(|(allowed, _)| allowed.eq_ignore_ascii_case(mime))
            .and_then(|&(_, ext)| image_type_for_extension(ext))
    }

    /// Canonical MIME type and extension for a file extension such as `JPEG`
    #[must_use]
    pub fn image_type_for_extension(extension: &str) -> Option<(&'static str, &'static str)> {
        let extension = extension.to_ascii_lowercase();
        let extension = if extension == "jpeg" { "jpg" } else { extension.as_str() };
        ALLOWED_TYPES
            .iter()
            .find(|(_, ext)| *ext == extension)
            .map(|&(allowed, ext)| (allowed, ext))
    }
}

/// One catalog entry of the default agreement types
#[derive(Debug, Clone, Copy)]
pub struct AgreementTypeSeed {
    /// Display name
    pub name: &'static str,
    /// Unique slug
    pub slug: &'static str,
    /// Short description
    pub description: &'static str,
    /// Icon glyph
    pub icon: &'static str,
}

/// Default agreement type catalog
pub const DEFAULT_AGREEMENT_TYPES: &[AgreementTypeSeed] = &[
    AgreementTypeSeed {
        name: "Love or Partnership",
        slug: "love-partnership",
        description: "For something worth keeping clear.",
        icon: "❤️",
    },
    AgreementTypeSeed {
        name: "Friendship or Promise",
        slug: "friendship-promise",
        description: "For two people finding balance.",
        icon: "🤝",
    },
    AgreementTypeSeed {
        name: "Work or Creative Collaboration",
        slug: "work-collaboration",
        description: "For shared vision and mutual respect.",
        icon: "✨",
    },
    AgreementTypeSeed {
        name: "Living Together",
        slug: "living-together",
        description: "For harmony in shared space.",
        icon: "🏠",
    },
    AgreementTypeSeed {
        name: "Personal Commitment",
        slug: "personal-commitment",
        description: "For a promise to yourself.",
        icon: "🌱",
    },
];
