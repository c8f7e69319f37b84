//! Documents exchanged with the relying party and the authenticator.
//!
//! Binary fields exist in two forms. On the wire they are base64url text
//! (`B = String`); once decoded they are raw buffers (`B = Vec<u8>`, the
//! default). The same structs describe both, so a wire document and the
//! options handed to the authenticator cannot drift apart.

use crate::{codec, error::ProtocolError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Credential type tag of every WebAuthn credential.
pub const PUBLIC_KEY: &str = "public-key";

/// Registration challenge as returned by `GET <register endpoint>`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RegistrationChallenge {
    #[serde(rename = "publicKey")]
    pub public_key: CreationOptions<String>,
}

/// Login challenge as returned by `GET <login endpoint>`.
///
/// Unlike the registration challenge it is not wrapped in `publicKey`.
pub type LoginChallenge = RequestOptions<String>;

/// Options for creating a new credential.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreationOptions<B = Vec<u8>> {
    pub challenge: B,
    pub rp: RelyingParty,
    pub user: UserEntity<B>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pub_key_cred_params: Vec<CredentialParameters>,
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub exclude_credentials: Vec<CredentialDescriptor<B>>,
    #[serde(default)]
    pub authenticator_selection: Option<Value>,
    #[serde(default)]
    pub attestation: Option<String>,
    /// Members this crate does not interpret, such as `extensions`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options for asserting an existing credential.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions<B = Vec<u8>> {
    pub challenge: B,
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub rp_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub allow_credentials: Vec<CredentialDescriptor<B>>,
    #[serde(default)]
    pub user_verification: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RelyingParty {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity<B = Vec<u8>> {
    pub id: B,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CredentialParameters {
    #[serde(rename = "type")]
    pub kind: String,
    pub alg: i64,
}

/// Identifies one acceptable credential.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CredentialDescriptor<B = Vec<u8>> {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: B,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub transports: Vec<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn decode_field(text: &str, field: impl FnOnce() -> String) -> Result<Vec<u8>, ProtocolError> {
    codec::decode(text).map_err(|source| ProtocolError::Decode {
        field: field(),
        source,
    })
}

fn decode_descriptors(
    descriptors: Vec<CredentialDescriptor<String>>,
    list: &str,
) -> Result<Vec<CredentialDescriptor>, ProtocolError> {
    descriptors
        .into_iter()
        .enumerate()
        .map(|(index, descriptor)| {
            Ok(CredentialDescriptor {
                id: decode_field(&descriptor.id, || format!("{list}[{index}].id"))?,
                kind: descriptor.kind,
                transports: descriptor.transports,
            })
        })
        .collect()
}

impl RegistrationChallenge {
    /// Decode every binary field: the challenge, the user id and the ids of
    /// the credentials to exclude.
    pub fn decode(self) -> Result<CreationOptions, ProtocolError> {
        let options = self.public_key;
        Ok(CreationOptions {
            challenge: decode_field(&options.challenge, || "publicKey.challenge".into())?,
            user: UserEntity {
                id: decode_field(&options.user.id, || "publicKey.user.id".into())?,
                name: options.user.name,
                display_name: options.user.display_name,
                extra: options.user.extra,
            },
            exclude_credentials: decode_descriptors(
                options.exclude_credentials,
                "publicKey.excludeCredentials",
            )?,
            rp: options.rp,
            pub_key_cred_params: options.pub_key_cred_params,
            timeout: options.timeout,
            authenticator_selection: options.authenticator_selection,
            attestation: options.attestation,
            extra: options.extra,
        })
    }
}

impl RequestOptions<String> {
    /// Decode the challenge and, independently, each allowed credential id.
    pub fn decode(self) -> Result<RequestOptions, ProtocolError> {
        Ok(RequestOptions {
            challenge: decode_field(&self.challenge, || "challenge".into())?,
            allow_credentials: decode_descriptors(self.allow_credentials, "allowCredentials")?,
            timeout: self.timeout,
            rp_id: self.rp_id,
            user_verification: self.user_verification,
            extra: self.extra,
        })
    }
}

/// Credential returned by the authenticator, with raw binary fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyCredential<R> {
    /// Text form of the credential id
    pub id: String,
    pub raw_id: Vec<u8>,
    pub kind: String,
    pub response: R,
}

/// Response of `create_credential`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationResponse {
    pub attestation_object: Vec<u8>,
    pub client_data_json: Vec<u8>,
}

/// Response of `get_assertion`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResponse {
    pub authenticator_data: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub signature: Vec<u8>,
    pub user_handle: Option<Vec<u8>>,
}

/// Body of `POST <endpoint>`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPayload<P> {
    pub id: String,
    pub raw_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub response: P,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttestationPayload {
    pub attestation_object: String,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssertionPayload {
    pub authenticator_data: String,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    pub signature: String,
    /// Empty when the authenticator returned no user handle
    pub user_handle: String,
}

/// Authenticator response that can be put on the wire.
pub trait EncodeResponse {
    type Payload: Serialize;

    fn encode(&self) -> Self::Payload;
}

impl EncodeResponse for AttestationResponse {
    type Payload = AttestationPayload;

    fn encode(&self) -> AttestationPayload {
        AttestationPayload {
            attestation_object: codec::encode(&self.attestation_object),
            client_data_json: codec::encode(&self.client_data_json),
        }
    }
}

impl EncodeResponse for AssertionResponse {
    type Payload = AssertionPayload;

    fn encode(&self) -> AssertionPayload {
        AssertionPayload {
            authenticator_data: codec::encode(&self.authenticator_data),
            client_data_json: codec::encode(&self.client_data_json),
            signature: codec::encode(&self.signature),
            user_handle: self
                .user_handle
                .as_deref()
                .map(codec::encode)
                .unwrap_or_default(),
        }
    }
}

impl<R: EncodeResponse> PublicKeyCredential<R> {
    /// Encode every binary field for submission.
    pub fn encode(&self) -> CredentialPayload<R::Payload> {
        CredentialPayload {
            id: self.id.clone(),
            raw_id: codec::encode(&self.raw_id),
            kind: self.kind.clone(),
            response: self.response.encode(),
        }
    }
}
