//! HTML page rendering.

use maud::{html, Markup, DOCTYPE};

const CSS: &str = "\
body{margin:0;font-family:system-ui,sans-serif;background:#fafafa;color:#222}\
header{display:flex;gap:1.5rem;align-items:baseline;padding:1rem 1.5rem;background:#fff;border-bottom:1px solid #e2e2e2}\
header h1{font-size:1.1rem;margin:0}\
header a{color:#444;text-decoration:none}\
header a:hover{text-decoration:underline}\
main{max-width:60rem;margin:2rem auto;padding:0 1.5rem}\
form.card{background:#fff;border:1px solid #e2e2e2;border-radius:6px;padding:1.5rem;max-width:24rem}\
form.card label{display:block;margin:.75rem 0 .25rem}\
form.card input{width:100%;box-sizing:border-box;padding:.4rem}\
form.card button{margin-top:1rem;padding:.5rem 1.25rem}\
p.error{color:#b00020}\
p.success{color:#1b5e20}\
ul.gallery{list-style:none;margin:0;padding:0;display:grid;grid-template-columns:repeat(auto-fill,minmax(14rem,1fr));gap:1rem}\
ul.gallery img{width:100%;height:12rem;object-fit:cover;border-radius:4px;display:block}\
ul.gallery figcaption{font-size:.85rem;color:#555;margin-top:.25rem;overflow-wrap:anywhere}";

fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (CSS) }
            }
            body {
                (content)
            }
        }
    }
}

fn site_header() -> Markup {
    html! {
        header {
            h1 { a href="/" { "Shoebox" } }
            a href="/upload" { "Upload" }
            a href="/photos" { "Gallery" }
        }
    }
}

/// Login form, optionally with a rejection message.
pub fn login(error: Option<&str>) -> Markup {
    base_document(
        "Log in",
        html! {
            main {
                form.card method="post" action="/login" {
                    h2 { "Log in" }
                    @if let Some(message) = error {
                        p.error { (message) }
                    }
                    label for="name" { "Name" }
                    input id="name" name="name" type="text" autocomplete="username" required;
                    label for="password" { "Password" }
                    input id="password" name="password" type="password" autocomplete="current-password" required;
                    button type="submit" { "Log in" }
                }
            }
        },
    )
}

/// Home page greeting with the configured display name.
pub fn home(site_name: &str) -> Markup {
    base_document(
        site_name,
        html! {
            (site_header())
            main {
                h2 { "Welcome to " (site_name) }
                p { "Share photos with the people who have the password." }
                p {
                    a href="/upload" { "Upload photos" }
                    " or "
                    a href="/photos" { "browse the gallery" }
                    "."
                }
            }
        },
    )
}

/// Outcome banner rendered on the upload page after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFlash {
    /// At least one file in the batch was stored.
    Uploaded {
        /// Number of files stored.
        accepted: usize,
    },
    /// Nothing in the batch was stored.
    Rejected {
        /// Message shown to the user.
        message: String,
    },
}

/// Upload form, optionally with the previous batch's outcome.
pub fn upload(flash: Option<&UploadFlash>) -> Markup {
    base_document(
        "Upload",
        html! {
            (site_header())
            main {
                @match flash {
                    Some(UploadFlash::Uploaded { accepted }) => {
                        p.success { "Uploaded " (accepted) " photo" @if *accepted != 1 { "s" } "." }
                    }
                    Some(UploadFlash::Rejected { message }) => {
                        p.error { (message) }
                    }
                    None => {}
                }
                form.card method="post" action="/upload" enctype="multipart/form-data" {
                    h2 { "Upload photos" }
                    label for="photos" { "Pick one or more images" }
                    input id="photos" name="photos" type="file" accept="image/*" multiple required;
                    button type="submit" { "Upload" }
                }
            }
        },
    )
}

/// Gallery of every photo in the manifest.
pub fn gallery(photos: &[String]) -> Markup {
    base_document(
        "Gallery",
        html! {
            (site_header())
            main {
                @if photos.is_empty() {
                    p { "No photos yet. " a href="/upload" { "Upload the first one." } }
                } @else {
                    ul.gallery {
                        @for name in photos {
                            li {
                                figure {
                                    img src={"/photos/" (name)} alt=(name) loading="lazy";
                                    figcaption { (name) }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

/// Generic failure page for unexpected handler errors.
pub fn failure() -> Markup {
    base_document(
        "Something went wrong",
        html! {
            main {
                h2 { "Something went wrong" }
                p { "The error has been logged. " a href="/" { "Back to safety." } }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_start_with_doctype() {
        assert!(login(None).into_string().starts_with("<!DOCTYPE html>"));
        assert!(home("Test").into_string().starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn login_error_is_rendered() {
        let doc = login(Some("Invalid username or password")).into_string();
        assert!(doc.contains("Invalid username or password"));
        assert!(!login(None).into_string().contains("class=\"error\""));
    }

    #[test]
    fn gallery_lists_photo_links() {
        let doc = gallery(&["a.jpg".to_owned(), "b.png".to_owned()]).into_string();
        assert!(doc.contains("/photos/a.jpg"));
        assert!(doc.contains("/photos/b.png"));
    }

    #[test]
    fn gallery_has_empty_state() {
        assert!(gallery(&[]).into_string().contains("No photos yet"));
    }

    #[test]
    fn upload_flash_variants_render() {
        let ok = upload(Some(&UploadFlash::Uploaded { accepted: 2 })).into_string();
        assert!(ok.contains("Uploaded 2 photos."));

        let err = upload(Some(&UploadFlash::Rejected {
            message: "No valid images were uploaded.".to_owned(),
        }))
        .into_string();
        assert!(err.contains("No valid images were uploaded."));
    }
}
