//! Page shell and public pages.

use crate::render::escape_html;

/// Wrap `content` in the site shell.
///
/// `content` is trusted markup produced by this crate.
#[must_use]
pub fn html_shell(title: &str, content: &str) -> String {
    let title = escape_html(title);
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="AI solutions for growing businesses">
    <title>{title} - AI Solution</title>

    <!-- HTMX and Alpine (local) -->
    <script src="/static/vendor/htmx-2.0.8.min.js"></script>
    <script defer src="/static/vendor/alpine.min.js"></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body class="min-h-screen bg-[#F5EFE7] text-[#213555] antialiased">
    <header class="sticky top-0 z-40 w-full bg-[#213555] text-white shadow-sm">
        <div class="container mx-auto flex h-16 items-center justify-between px-6 max-w-6xl">
            <a href="/" class="font-semibold text-lg">AI Solution</a>
            <nav class="flex items-center gap-2">
                <a href="/" class="px-3 py-2 rounded-lg text-sm hover:bg-[#3E5879]">Home</a>
                <a href="/events" class="px-3 py-2 rounded-lg text-sm hover:bg-[#3E5879]">Events</a>
                <a href="/contact" class="px-3 py-2 rounded-lg text-sm hover:bg-[#3E5879]">Contact</a>
                <a href="/admin/dashboard" class="px-3 py-2 rounded-lg text-sm hover:bg-[#3E5879]">Admin</a>
            </nav>
        </div>
    </header>

    <main id="app" class="container mx-auto px-6 py-10 max-w-6xl">
        {content}
    </main>

    <footer class="py-6">
        <p class="text-xs text-center text-[#3E5879]">AI Solution</p>
    </footer>
</body>
</html>"#)
}

/// Landing page content.
#[must_use]
pub fn home_content() -> &'static str {
    r#"
    <section class="rounded-3xl bg-white p-10 shadow-lg">
        <h1 class="text-3xl font-bold mb-4">AI solutions that fit your business</h1>
        <p class="text-[#3E5879] mb-8">
            We design, build and operate AI assistants, analytics and automation
            for teams of every size. Ask our assistant anything using the chat
            button in the corner.
        </p>
        <div class="grid gap-4 md:grid-cols-3">
            <div class="p-5 rounded-2xl bg-[#F5EFE7]">
                <h3 class="font-semibold mb-2">Consulting</h3>
                <p class="text-sm">Find where AI pays off before writing a line of code.</p>
            </div>
            <div class="p-5 rounded-2xl bg-[#F5EFE7]">
                <h3 class="font-semibold mb-2">Delivery</h3>
                <p class="text-sm">Production systems integrated with the tools you already use.</p>
            </div>
            <div class="p-5 rounded-2xl bg-[#F5EFE7]">
                <h3 class="font-semibold mb-2">Support</h3>
                <p class="text-sm">Monitoring, tuning and training after launch.</p>
            </div>
        </div>
    </section>
    "#
}

/// 404 page content.
#[must_use]
pub fn not_found_content() -> &'static str {
    r#"
    <div class="flex flex-col items-center justify-center py-20">
        <h1 class="text-4xl font-bold mb-4">404</h1>
        <p class="mb-6">Page not found</p>
        <a href="/" class="px-6 py-3 rounded-xl bg-[#213555] text-white">Go Home</a>
    </div>
    "#
}
