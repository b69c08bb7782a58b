mod convert;

pub mod shorturl {
    pub mod v1 {
        tonic::include_proto!("shorturl.v1");
    }
}

pub mod v1 {
    pub use crate::convert::v1::*;
    pub use crate::shorturl::v1::*;
}

/// Encoded `FileDescriptorSet` of every compiled proto, for gRPC reflection.
pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("shorturl_descriptor");

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;
    use prost_types::FileDescriptorSet;

    #[test]
    fn descriptor_set_describes_url_shortener() {
        let set = FileDescriptorSet::decode(FILE_DESCRIPTOR_SET).unwrap();

        let file = set
            .file
            .iter()
            .find(|file| file.package() == "shorturl.v1")
            .expect("shorturl.v1 descriptor");
        let service = file
            .service
            .iter()
            .find(|service| service.name() == "URLShortener")
            .expect("URLShortener service");
        let methods: Vec<_> = service.method.iter().map(|m| m.name()).collect();
        assert_eq!(methods, ["CreateShortURL", "GetLongURL"]);
    }
}
