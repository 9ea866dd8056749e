use crate::foundation::core::Size;
use crate::foundation::error::{GlassError, GlassResult};
use crate::shader::texture::DisplacementTexture;
use std::fmt;
use std::fmt::Write as _;

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LEN: usize = 9;

/// Element id a consumer references to activate the effect, e.g. `url(#liquid-glass-x1y2z3_filter)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FilterHandle(String);

impl FilterHandle {
    /// Raw element id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// CSS / SVG `url(#id)` reference.
    pub fn css_url(&self) -> String {
        format!("url(#{})", self.0)
    }
}

impl fmt::Display for FilterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generate a base id `"{prefix}-{token}"` with a 9 character lowercase alphanumeric token.
pub fn generate_base_id(prefix: &str, rng: &mut fastrand::Rng) -> String {
    let mut id = String::with_capacity(prefix.len() + 1 + TOKEN_LEN);
    id.push_str(prefix);
    id.push('-');
    for _ in 0..TOKEN_LEN {
        id.push(char::from(TOKEN_ALPHABET[rng.usize(..TOKEN_ALPHABET.len())]));
    }
    id
}

/// Color channel read by the displacement stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelSelector {
    /// Red.
    R,
    /// Green.
    G,
    /// Blue.
    B,
    /// Alpha.
    A,
}

impl ChannelSelector {
    fn as_str(self) -> &'static str {
        match self {
            Self::R => "R",
            Self::G => "G",
            Self::B => "B",
            Self::A => "A",
        }
    }
}

/// Stage 1: the displacement texture as an image source.
#[derive(Clone, Debug, PartialEq)]
pub struct FeImage {
    /// Result name stage 2 reads from.
    pub result: String,
    /// Image width in user units.
    pub width: f64,
    /// Image height in user units.
    pub height: f64,
    /// Current texture, `None` until the first publish.
    pub href: Option<String>,
}

/// Stage 2: offsets samples of the source graphic by the texture channels.
#[derive(Clone, Debug, PartialEq)]
pub struct FeDisplacementMap {
    /// Content being displaced.
    pub input: String,
    /// Map input, the [`FeImage`] result.
    pub input2: String,
    /// Channel driving horizontal offsets.
    pub x_channel: ChannelSelector,
    /// Channel driving vertical offsets.
    pub y_channel: ChannelSelector,
    /// Offset in user units for a full channel swing.
    pub scale: f64,
}

/// Snapshot handed to the host on every publish. Carries both stage updates together.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterUpdate {
    /// Filter the update belongs to.
    pub handle: FilterHandle,
    /// Filter region in surface pixels.
    pub region: Size,
    /// New image source.
    pub href: String,
    /// New displacement scale in surface pixels.
    pub scale: f64,
    /// Monotonic publish counter, starting at 1.
    pub revision: u64,
}

/// Two-stage filter graph: image source followed by a displacement map over the source graphic.
#[derive(Clone, Debug)]
pub struct FilterGraph {
    handle: FilterHandle,
    region: Size,
    image: FeImage,
    displacement: FeDisplacementMap,
    revision: u64,
}

impl FilterGraph {
    /// Build an unpublished graph for a surface of `region` size.
    pub fn new(base_id: &str, region: Size) -> GlassResult<Self> {
        validate_id(base_id)?;
        let map = format!("{base_id}_map");
        Ok(Self {
            handle: FilterHandle(format!("{base_id}_filter")),
            region,
            image: FeImage {
                result: map.clone(),
                width: region.width,
                height: region.height,
                href: None,
            },
            displacement: FeDisplacementMap {
                input: "SourceGraphic".to_string(),
                input2: map,
                x_channel: ChannelSelector::R,
                y_channel: ChannelSelector::G,
                scale: 0.0,
            },
            revision: 0,
        })
    }

    /// Stable handle; never changes over the graph's lifetime.
    pub fn handle(&self) -> &FilterHandle {
        &self.handle
    }

    /// Filter region in surface pixels.
    pub fn region(&self) -> Size {
        self.region
    }

    /// Stage 1.
    pub fn image(&self) -> &FeImage {
        &self.image
    }

    /// Stage 2.
    pub fn displacement(&self) -> &FeDisplacementMap {
        &self.displacement
    }

    /// Number of publishes so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether a texture has been published.
    pub fn is_published(&self) -> bool {
        self.image.href.is_some()
    }

    /// Track a new surface size. The next publish supplies a matching texture.
    pub fn resize(&mut self, region: Size) {
        self.region = region;
        self.image.width = region.width;
        self.image.height = region.height;
    }

    /// Swap in `texture` and its scale.
    ///
    /// `resolution` is texture pixels per surface pixel; the scale is converted to surface
    /// units. Encoding happens before any field is touched, so a failure leaves the previous
    /// texture and scale in place.
    pub fn publish(
        &mut self,
        texture: &DisplacementTexture,
        resolution: f64,
    ) -> GlassResult<FilterUpdate> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(GlassError::validation("resolution must be finite and > 0"));
        }
        let href = texture.to_data_url()?;
        let scale = texture.filter_scale() / resolution;

        self.image.href = Some(href.clone());
        self.displacement.scale = scale;
        self.revision += 1;

        Ok(FilterUpdate {
            handle: self.handle.clone(),
            region: self.region,
            href,
            scale,
            revision: self.revision,
        })
    }

    /// The `<filter>` element alone.
    pub fn filter_markup(&self) -> String {
        let mut s = String::new();
        let w = self.region.width;
        let h = self.region.height;
        let _ = write!(
            s,
            r#"<filter id="{}" filterUnits="userSpaceOnUse" color-interpolation-filters="sRGB" x="0" y="0" width="{w}" height="{h}">"#,
            self.handle
        );
        let _ = write!(
            s,
            r#"<feImage result="{}" x="0" y="0" width="{}" height="{}" preserveAspectRatio="none""#,
            self.image.result, self.image.width, self.image.height
        );
        if let Some(href) = &self.image.href {
            let _ = write!(s, r#" href="{0}" xlink:href="{0}""#, escape_attr(href));
        }
        s.push_str("/>");
        let d = &self.displacement;
        let _ = write!(
            s,
            r#"<feDisplacementMap in="{}" in2="{}" xChannelSelector="{}" yChannelSelector="{}" scale="{}"/>"#,
            d.input,
            d.input2,
            d.x_channel.as_str(),
            d.y_channel.as_str(),
            d.scale
        );
        s.push_str("</filter>");
        s
    }

    /// Zero-sized, fixed-position `<svg>` carrying the filter definition.
    pub fn to_svg(&self) -> String {
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" "#,
                r#"width="0" height="0" "#,
                r#"style="position:fixed;top:0;left:0;pointer-events:none;z-index:9998">"#,
                "<defs>{}</defs></svg>"
            ),
            self.filter_markup()
        )
    }
}

fn validate_id(id: &str) -> GlassResult<()> {
    let ok = !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if !ok {
        return Err(GlassError::validation(format!(
            "filter id must be non-empty [A-Za-z0-9_-], got {id:?}"
        )));
    }
    Ok(())
}

fn escape_attr(v: &str) -> String {
    let mut out = String::with_capacity(v.len());
    for c in v.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/filter/graph.rs"]
mod tests;
