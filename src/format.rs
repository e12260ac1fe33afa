use crate::model::PaperRecord;

// Formatter for the email digest.
pub struct Formatter;

impl Formatter {
    pub fn digest_subject(count: usize) -> String {
        format!("arXiv Paper Notification - {} New Papers", count)
    }

    pub fn to_plain_text(data: &PaperRecord) -> String {
        format!("Title: {}\nAuthors: {}\nCategory: {}\nAbstract: {}\nLink: {}\n\n",
            data.title,
            data.authors,
            data.category,
            data.summary,
            data.link
        )
    }

    pub fn digest_body(data: &[PaperRecord]) -> String {
        data.iter().fold(String::from("Recent arXiv Papers:\n\n"), |mut body, paper| {
            body.push_str(&Self::to_plain_text(paper));
            body
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(n: usize) -> PaperRecord {
        PaperRecord {
            title: format!("Paper {}", n),
            summary: format!("Abstract {}", n),
            link: format!("http://arxiv.org/abs/2501.0000{}v1", n),
            authors: "A. Author, B. Author".to_string(),
            category: "hep-ex".to_string()
        }
    }

    #[test]
    fn test_subject_has_count() {
        assert_eq!(Formatter::digest_subject(3), "arXiv Paper Notification - 3 New Papers");
    }

    #[test]
    fn test_body_layout() {
        let body = Formatter::digest_body(&[paper(1)]);
        let expected = concat!(
            "Recent arXiv Papers:\n\n",
            "Title: Paper 1\n",
            "Authors: A. Author, B. Author\n",
            "Category: hep-ex\n",
            "Abstract: Abstract 1\n",
            "Link: http://arxiv.org/abs/2501.00001v1\n\n"
        );
        assert_eq!(body, expected, "digest body improperly formatted");
    }

    #[test]
    fn test_body_keeps_order() {
        let body = Formatter::digest_body(&[paper(2), paper(1)]);
        let first = body.find("Paper 2").unwrap();
        let second = body.find("Paper 1").unwrap();
        assert!(first < second);
    }
}
