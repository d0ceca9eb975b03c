use maud::{html, Markup, DOCTYPE};

pub fn base(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }

                // Tailwind CSS CDN
                script src="https://cdn.tailwindcss.com" {}

                // HTMX
                script src="https://unpkg.com/htmx.org@1.9.10" {}
            }
            body class="min-h-screen bg-gray-50" {
                main class="flex min-h-screen items-center justify-center px-4" {
                    (content)
                }
            }
        }
    }
}
