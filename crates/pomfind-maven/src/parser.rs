//! pom.xml and maven-metadata.xml parsers.
//!
//! Uses the quick-xml SAX reader. Elements are matched by their path below
//! the root element, so nested look-alikes (`<exclusion><groupId>`, plugin
//! `<dependencies>`) never leak into the fields of the enclosing entry.
//!
//! Bodies that are not valid UTF-8 are decoded lossily: repositories still
//! serve ISO-8859-1 POMs, and only ASCII fields are read from them.

use crate::error::{MavenError, Result};
use crate::metadata::Metadata;
use crate::project::Project;
use crate::types::Dependency;
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};

/// Group assumed for `<plugin>` entries that omit `<groupId>`.
pub const DEFAULT_PLUGIN_GROUP: &str = "org.apache.maven.plugins";

/// Walker callback input; paths include the root element.
enum Node<'a> {
    Open(&'a [String]),
    Text(&'a [String], String),
    Close(&'a [String]),
}

/// Where a `<dependency>`-like entry was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Dependencies,
    DependencyManagement,
    Plugins,
}

impl Section {
    fn of(path: &[&str]) -> Option<Self> {
        match path {
            ["dependencies", "dependency"] => Some(Self::Dependencies),
            ["dependencyManagement", "dependencies", "dependency"] => {
                Some(Self::DependencyManagement)
            }
            ["build", "plugins", "plugin"] => Some(Self::Plugins),
            _ => None,
        }
    }
}

/// Parses a pom.xml document.
///
/// # Errors
///
/// Returns [`MavenError::ParseError`] for malformed XML, for a document
/// without a root element and for a document that ends inside an element.
pub fn parse_pom(content: &[u8]) -> Result<Project> {
    let mut project = Project::default();
    let mut current: Option<Dependency> = None;

    walk(content, |node| match node {
        Node::Open(path) => {
            if Section::of(&below_root(path)).is_some() {
                current = Some(Dependency::default());
            }
        }
        Node::Text(path, text) => {
            let rel = below_root(path);
            match rel.as_slice() {
                ["groupId"] => project.group_id = text,
                ["artifactId"] => project.artifact_id = text,
                ["version"] => project.version = text,
                ["name"] => project.name = text,
                ["parent", field] => {
                    set_field(project.parent.get_or_insert_default(), field, text);
                }
                ["properties", key] => {
                    project.properties.insert((*key).to_string(), text);
                }
                [entry @ .., field] if Section::of(entry).is_some() => {
                    if let Some(dep) = current.as_mut() {
                        set_field(dep, field, text);
                    }
                }
                _ => {}
            }
        }
        Node::Close(path) => {
            let Some(section) = Section::of(&below_root(path)) else {
                return;
            };
            let Some(mut dep) = current.take() else {
                return;
            };
            match section {
                Section::Dependencies => project.dependencies.push(dep),
                Section::DependencyManagement => {
                    dep.transitive = true;
                    project.dependency_management.push(dep);
                }
                Section::Plugins => {
                    if dep.group_id.is_empty() {
                        dep.group_id = DEFAULT_PLUGIN_GROUP.to_string();
                    }
                    project.plugins.push(dep);
                }
            }
        }
    })?;

    Ok(project)
}

/// Parses a maven-metadata.xml document.
///
/// # Errors
///
/// Same conditions as [`parse_pom`].
pub fn parse_metadata(content: &[u8]) -> Result<Metadata> {
    let mut meta = Metadata::default();

    walk(content, |node| {
        let Node::Text(path, text) = node else {
            return;
        };
        match below_root(path).as_slice() {
            ["groupId"] => meta.group_id = text,
            ["artifactId"] => meta.artifact_id = text,
            ["version"] => meta.version = text,
            ["versioning", "latest"] => meta.versioning.latest = text,
            ["versioning", "release"] => meta.versioning.release = text,
            ["versioning", "versions", "version"] => meta.versioning.versions.push(text),
            _ => {}
        }
    })?;

    Ok(meta)
}

fn below_root(path: &[String]) -> Vec<&str> {
    path.iter().skip(1).map(String::as_str).collect()
}

fn set_field(dep: &mut Dependency, field: &str, text: String) {
    match field {
        "groupId" => dep.group_id = text,
        "artifactId" => dep.artifact_id = text,
        "version" => dep.version = text,
        "scope" => dep.scope = text,
        "optional" => dep.optional = text.eq_ignore_ascii_case("true"),
        _ => {}
    }
}

/// Drives the SAX reader and reports element boundaries and text content.
///
/// Text split across several events (text, CDATA) is joined and reported
/// once, right before the next element boundary.
fn walk<F>(content: &[u8], mut visit: F) -> Result<()>
where
    F: FnMut(Node<'_>),
{
    // Text is trimmed once per element in `flush_text`; trimming each event
    // would drop the spaces around entity references.
    let mut reader = Reader::from_reader(content);

    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut seen_root = false;

    loop {
        let event = reader.read_event().map_err(|e| MavenError::ParseError {
            message: format!("{e} (at byte {})", reader.buffer_position()),
        })?;

        match event {
            Event::Start(ref e) => {
                flush_text(&mut text, &path, &mut visit);
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).to_string());
                seen_root = true;
                visit(Node::Open(&path));
            }
            Event::Empty(ref e) => {
                flush_text(&mut text, &path, &mut visit);
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).to_string());
                seen_root = true;
                visit(Node::Open(&path));
                visit(Node::Close(&path));
                path.pop();
            }
            Event::Text(ref e) => match e.decode() {
                Ok(cow) => text.push_str(&cow),
                Err(_) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            },
            Event::CData(ref e) => text.push_str(&String::from_utf8_lossy(e)),
            Event::GeneralRef(ref e) => push_reference(&mut text, e)?,
            Event::End(_) => {
                flush_text(&mut text, &path, &mut visit);
                visit(Node::Close(&path));
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(MavenError::ParseError {
            message: "document has no root element".into(),
        });
    }
    if let Some(open) = path.last() {
        return Err(MavenError::ParseError {
            message: format!("unexpected end of document inside <{open}>"),
        });
    }

    Ok(())
}

/// Appends the text an `&...;` reference stands for.
///
/// Character references and the five predefined entities are resolved;
/// anything else (DTD-declared entities) is kept literally.
fn push_reference(text: &mut String, reference: &BytesRef<'_>) -> Result<()> {
    if let Some(ch) = reference.resolve_char_ref().map_err(invalid_reference)? {
        text.push(ch);
        return Ok(());
    }

    let name = reference.decode().map_err(invalid_reference)?;
    match resolve_predefined_entity(&name) {
        Some(value) => text.push_str(value),
        None => {
            text.push('&');
            text.push_str(&name);
            text.push(';');
        }
    }
    Ok(())
}

fn invalid_reference(e: impl std::fmt::Display) -> MavenError {
    MavenError::ParseError {
        message: format!("invalid entity reference: {e}"),
    }
}

fn flush_text<F>(text: &mut String, path: &[String], visit: &mut F)
where
    F: FnMut(Node<'_>),
{
    let value = std::mem::take(text);
    let value = value.trim();
    if !value.is_empty() && !path.is_empty() {
        visit(Node::Text(path, value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_pom() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<project>
  <groupId>com.example</groupId>
  <artifactId>app</artifactId>
  <version>1.0.0</version>
  <dependencies>
    <dependency>
      <groupId>org.apache.commons</groupId>
      <artifactId>commons-lang3</artifactId>
      <version>3.14.0</version>
    </dependency>
  </dependencies>
</project>"#;

        let project = parse_pom(xml).unwrap();
        assert_eq!(project.group_id, "com.example");
        assert_eq!(project.artifact_id, "app");
        assert_eq!(project.version, "1.0.0");
        assert_eq!(project.dependencies.len(), 1);
        let dep = &project.dependencies[0];
        assert_eq!(dep.group_id, "org.apache.commons");
        assert_eq!(dep.artifact_id, "commons-lang3");
        assert_eq!(dep.version, "3.14.0");
        assert!(dep.scope.is_empty());
        assert!(!dep.transitive);
    }

    #[test]
    fn test_parse_scope_and_optional() {
        let xml = br"<project>
  <dependencies>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.13.2</version>
      <scope>test</scope>
    </dependency>
    <dependency>
      <groupId>com.google.code.findbugs</groupId>
      <artifactId>jsr305</artifactId>
      <version>3.0.2</version>
      <optional>true</optional>
    </dependency>
  </dependencies>
</project>";

        let project = parse_pom(xml).unwrap();
        assert_eq!(project.dependencies[0].scope, "test");
        assert!(!project.dependencies[0].optional);
        assert!(project.dependencies[1].optional);
    }

    #[test]
    fn test_parse_dependency_management_is_transitive() {
        let xml = br"<project>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>org.springframework.boot</groupId>
        <artifactId>spring-boot-dependencies</artifactId>
        <version>3.2.0</version>
        <type>pom</type>
        <scope>import</scope>
      </dependency>
    </dependencies>
  </dependencyManagement>
</project>";

        let project = parse_pom(xml).unwrap();
        assert!(project.dependencies.is_empty());
        assert_eq!(project.dependency_management.len(), 1);
        let dep = &project.dependency_management[0];
        assert!(dep.transitive);
        assert_eq!(dep.scope, "import");
    }

    #[test]
    fn test_parse_plugins() {
        let xml = br"<project>
  <build>
    <plugins>
      <plugin>
        <artifactId>maven-compiler-plugin</artifactId>
        <version>3.11.0</version>
        <dependencies>
          <dependency>
            <groupId>org.ow2.asm</groupId>
            <artifactId>asm</artifactId>
          </dependency>
        </dependencies>
      </plugin>
    </plugins>
  </build>
</project>";

        let project = parse_pom(xml).unwrap();
        assert_eq!(project.plugins.len(), 1);
        let plugin = &project.plugins[0];
        assert_eq!(plugin.group_id, DEFAULT_PLUGIN_GROUP);
        assert_eq!(plugin.artifact_id, "maven-compiler-plugin");
        assert_eq!(plugin.version, "3.11.0");
        assert!(project.dependencies.is_empty());
    }

    #[test]
    fn test_exclusions_do_not_override_fields() {
        let xml = br"<project>
  <dependencies>
    <dependency>
      <groupId>org.hibernate</groupId>
      <artifactId>hibernate-core</artifactId>
      <version>6.4.1.Final</version>
      <exclusions>
        <exclusion>
          <groupId>javax.xml.bind</groupId>
          <artifactId>jaxb-api</artifactId>
        </exclusion>
      </exclusions>
    </dependency>
  </dependencies>
</project>";

        let project = parse_pom(xml).unwrap();
        assert_eq!(project.dependencies.len(), 1);
        assert_eq!(project.dependencies[0].group_id, "org.hibernate");
        assert_eq!(project.dependencies[0].artifact_id, "hibernate-core");
    }

    #[test]
    fn test_parse_parent_and_properties() {
        let xml = br"<project>
  <parent>
    <groupId>org.sonatype.oss</groupId>
    <artifactId>oss-parent</artifactId>
    <version>7</version>
  </parent>
  <artifactId>child</artifactId>
  <properties>
    <slf4j.version>2.0.9</slf4j.version>
  </properties>
</project>";

        let project = parse_pom(xml).unwrap();
        let parent = project.parent.as_ref().unwrap();
        assert_eq!(parent.group_id, "org.sonatype.oss");
        assert_eq!(parent.artifact_id, "oss-parent");
        assert_eq!(parent.version, "7");
        assert_eq!(
            project.properties.get("slf4j.version").map(String::as_str),
            Some("2.0.9")
        );
        assert!(project.group_id.is_empty());
    }

    #[test]
    fn test_parse_with_namespaces() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dependencies>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.13.2</version>
    </dependency>
  </dependencies>
</project>"#;

        let project = parse_pom(xml).unwrap();
        assert_eq!(project.dependencies.len(), 1);
        assert_eq!(project.dependencies[0].artifact_id, "junit");
    }

    #[test]
    fn test_parse_cdata_and_empty_elements() {
        let xml = br"<project>
  <dependencies>
    <dependency>
      <groupId><![CDATA[org.example]]></groupId>
      <artifactId>lib</artifactId>
      <version/>
    </dependency>
  </dependencies>
</project>";

        let project = parse_pom(xml).unwrap();
        assert_eq!(project.dependencies[0].group_id, "org.example");
        assert!(project.dependencies[0].version.is_empty());
    }

    #[test]
    fn test_parse_entity_references() {
        let xml = br"<project>
  <name>A &amp; B</name>
  <dependencies>
    <dependency>
      <groupId>com.google.guava</groupId>
      <artifactId>guava</artifactId>
      <version>33.0.0&#45;jre</version>
    </dependency>
  </dependencies>
</project>";

        let project = parse_pom(xml).unwrap();
        assert_eq!(project.name, "A & B");
        assert_eq!(project.dependencies[0].version, "33.0.0-jre");
        assert_eq!(
            project.dependencies[0].pom_path(),
            "com/google/guava/guava/33.0.0-jre/guava-33.0.0-jre.pom"
        );
    }

    #[test]
    fn test_parse_hex_and_unknown_references() {
        let xml = br"<metadata>
  <versioning><latest>1&#x2E;2</latest><release>&lt;&custom;&gt;</release></versioning>
</metadata>";

        let meta = parse_metadata(xml).unwrap();
        assert_eq!(meta.versioning.latest, "1.2");
        assert_eq!(meta.versioning.release, "<&custom;>");
    }

    #[test]
    fn test_parse_latin1_body() {
        let mut xml = b"<project><name>Caf".to_vec();
        xml.push(0xE9);
        xml.extend_from_slice(b"</name><artifactId>cafe</artifactId></project>");

        let project = parse_pom(&xml).unwrap();
        assert_eq!(project.artifact_id, "cafe");
        assert!(project.name.starts_with("Caf"));
    }

    #[test]
    fn test_parse_mismatched_tags() {
        let xml = b"<project><dependencies></project>";
        assert!(parse_pom(xml).is_err());
    }

    #[test]
    fn test_parse_truncated_document() {
        let xml = b"<project><dependencies><dependency><groupId>a</groupId>";
        assert!(matches!(
            parse_pom(xml),
            Err(MavenError::ParseError { .. })
        ));
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse_pom(b"").is_err());
        assert!(parse_pom(b"   ").is_err());
        assert!(parse_metadata(b"").is_err());
    }

    #[test]
    fn test_parse_unclosed_attribute() {
        let xml = br#"<project attr="unclosed></project>"#;
        assert!(parse_pom(xml).is_err());
    }

    #[test]
    fn test_parse_metadata() {
        let xml = br"<?xml version='1.0' encoding='UTF-8'?>
<metadata>
  <groupId>junit</groupId>
  <artifactId>junit</artifactId>
  <versioning>
    <latest>4.13.2</latest>
    <release>4.13.2</release>
    <versions>
      <version>4.12</version>
      <version>4.13.1</version>
      <version>4.13.2</version>
    </versions>
    <lastUpdated>20210213164433</lastUpdated>
  </versioning>
</metadata>";

        let meta = parse_metadata(xml).unwrap();
        assert_eq!(meta.group_id, "junit");
        assert_eq!(meta.artifact_id, "junit");
        assert_eq!(meta.versioning.latest, "4.13.2");
        assert_eq!(meta.versioning.release, "4.13.2");
        assert_eq!(meta.versioning.versions, vec!["4.12", "4.13.1", "4.13.2"]);
        assert!(meta.version.is_empty());
    }
}
