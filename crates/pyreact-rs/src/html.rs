//! Runnable HTML page generation.
//!
//! Wraps the generated bundle in a standalone page that loads the
//! React UMD builds, gives every mounted component its own container
//! div, and calls `ReactDOM.render` once per component.

/// Container element id for a component.
pub fn mount_id(component: &str) -> String {
    format!("{}-root", component.to_ascii_lowercase())
}

/// Builds the complete HTML document around `js_code`.
///
/// `components` selects which components get a container and a render
/// call; the embedded bundle still carries every compiled component.
pub fn render_page(js_code: &str, components: &[&str], title: &str) -> String {
    let containers: Vec<String> = components
        .iter()
        .map(|name| format!("    <div id=\"{}\"></div>", mount_id(name)))
        .collect();
    let render_calls: Vec<String> = components
        .iter()
        .map(|name| {
            format!(
                "    ReactDOM.render(React.createElement({}), document.getElementById('{}'));",
                name,
                mount_id(name)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="https://unpkg.com/react@17/umd/react.development.js"></script>
    <script src="https://unpkg.com/react-dom@17/umd/react-dom.development.js"></script>
    <style>
        body {{
            font-family: Arial, sans-serif;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            background-color: #f5f5f5;
        }}

        button {{
            background-color: #007bff;
            color: white;
            border: none;
            padding: 10px 20px;
            border-radius: 4px;
            cursor: pointer;
            font-size: 16px;
            margin: 5px;
        }}

        button:hover {{
            background-color: #0056b3;
        }}

        h1, h2, h3 {{
            color: #333;
        }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <p>Components generated by PyReact - Python to JavaScript React Transpiler</p>

{containers}

    <script>
{js_code}

    // Render components
{render_calls}
    </script>
</body>
</html>"#,
        title = title,
        containers = containers.join("\n"),
        js_code = js_code.trim_end(),
        render_calls = render_calls.join("\n"),
    )
}
