//! Message templates and placeholder substitution

use rand::Rng;

pub const GREETING: &str = "{greeting}";
pub const RECIPIENT: &str = "{recipient}";
pub const CLIENT: &str = "{client}";
pub const ADDRESS: &str = "{address}";
pub const WINDOW: &str = "{window}";

const BUILTIN: &[&str] = &[
    "{greeting} {recipient}! Le escribimos de parte de {client}. Su pedido será entregado hoy en {address} en el horario de {window} hs.",
    "{greeting}, {recipient}. Hoy visitaremos {address} para entregar su envío de {client}. Horario estimado: {window} hs.",
    "¡{greeting}! {recipient}, su paquete de {client} ya está en camino. Lo estaremos visitando en {address} entre las {window} hs.",
    "{greeting} {recipient}, somos el servicio de entrega de {client}. Pasaremos por {address} de {window} hs. Por favor, esté atento/a.",
    "{greeting}. {recipient}, su compra en {client} llega hoy. Dirección: {address}. Ventana de entrega: {window} hs.",
];

/// Values substituted into a template
#[derive(Debug, Clone, Copy)]
pub struct TemplateVars<'a> {
    pub greeting: &'a str,
    pub recipient: &'a str,
    pub client: &'a str,
    pub address: &'a str,
    pub window: &'a str,
}

impl<'a> TemplateVars<'a> {
    fn lookup(&self, placeholder: &str) -> Option<&'a str> {
        match placeholder {
            GREETING => Some(self.greeting),
            RECIPIENT => Some(self.recipient),
            CLIENT => Some(self.client),
            ADDRESS => Some(self.address),
            WINDOW => Some(self.window),
            _ => None,
        }
    }
}

/// Read-only set of templates one message is drawn from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCatalog {
    templates: Vec<String>,
}

impl TemplateCatalog {
    /// Built-in Spanish catalog
    pub fn builtin() -> Self {
        Self {
            templates: BUILTIN.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Custom catalog; `None` when `templates` is empty
    pub fn new(templates: Vec<String>) -> Option<Self> {
        if templates.is_empty() {
            None
        } else {
            Some(Self { templates })
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    /// Uniformly random template
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        let index = rng.gen_range(0..self.templates.len());
        &self.templates[index]
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Replace every placeholder occurrence in one pass
///
/// Substituted values are copied verbatim and never rescanned, so a
/// recipient named `{client}` stays literal. Unknown `{...}` tokens are kept.
pub fn fill(template: &str, vars: &TemplateVars<'_>) -> String {
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let replaced = tail
            .find('}')
            .map(|end| &tail[..=end])
            .and_then(|token| vars.lookup(token).map(|value| (token.len(), value)));

        match replaced {
            Some((consumed, value)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
