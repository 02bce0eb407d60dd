//! BLE Serial Connection
//!
//! Windows implementation of [`Transport`] for BLE UART modules. Handles
//! device lookup, GATT service access and chunked writes to the serial
//! characteristic.

use crate::infrastructure::bluetooth::protocol::{self, MAX_WRITE_CHUNK};
use crate::infrastructure::bluetooth::transport::{Transport, TransportError};
use tracing::{debug, error, info, warn};
use windows::core::GUID;
use windows::Devices::Bluetooth::GenericAttributeProfile::{
    GattCharacteristic, GattCharacteristicProperties, GattCommunicationStatus, GattWriteOption,
};
use windows::Devices::Bluetooth::{BluetoothConnectionStatus, BluetoothLEDevice};
use windows::Storage::Streams::DataWriter;

/// Configuration for connection behavior
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Serial service UUID to look for
    pub service_uuid: String,
    /// Characteristic that accepts serial writes
    pub write_char_uuid: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            service_uuid: protocol::SERIAL_SERVICE_UUID.to_string(),
            write_char_uuid: protocol::SERIAL_WRITE_CHAR_UUID.to_string(),
        }
    }
}

/// BLE UART link
pub struct BleSerialTransport {
    config: ConnectionConfig,
    device: Option<BluetoothLEDevice>,
    write_characteristic: Option<GattCharacteristic>,
    write_option: GattWriteOption,
}

impl BleSerialTransport {
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            device: None,
            write_characteristic: None,
            write_option: GattWriteOption::WriteWithResponse,
        }
    }

    /// Connect to BLE device
    async fn connect_device(&self, address: u64) -> Result<BluetoothLEDevice, TransportError> {
        let device = BluetoothLEDevice::FromBluetoothAddressAsync(address)?.await?;
        Ok(device)
    }

    /// Locate the serial write characteristic
    async fn get_write_characteristic(
        &self,
        device: &BluetoothLEDevice,
    ) -> Result<GattCharacteristic, TransportError> {
        let service_uuid = GUID::from_u128(protocol::parse_uuid(&self.config.service_uuid)?);
        let write_uuid = GUID::from_u128(protocol::parse_uuid(&self.config.write_char_uuid)?);

        let services_result = device.GetGattServicesForUuidAsync(service_uuid)?.await?;
        if services_result.Status()? != GattCommunicationStatus::Success {
            error!(
                "Failed to get GATT services: {:?}",
                services_result.Status()?
            );
            return Err(TransportError::ServiceNotFound);
        }

        let services = services_result.Services()?;
        if services.Size()? == 0 {
            return Err(TransportError::ServiceNotFound);
        }

        let service = services.GetAt(0)?;
        info!("Found serial service");

        let chars_result = service.GetCharacteristicsForUuidAsync(write_uuid)?.await?;
        if chars_result.Status()? != GattCommunicationStatus::Success {
            error!(
                "Failed to get characteristics: {:?}",
                chars_result.Status()?
            );
            return Err(TransportError::CharacteristicNotFound);
        }

        let characteristics = chars_result.Characteristics()?;
        if characteristics.Size()? == 0 {
            return Err(TransportError::CharacteristicNotFound);
        }

        Ok(characteristics.GetAt(0)?)
    }

    fn preferred_write_option(characteristic: &GattCharacteristic) -> GattWriteOption {
        match characteristic.CharacteristicProperties() {
            Ok(props)
                if (props & GattCharacteristicProperties::WriteWithoutResponse)
                    == GattCharacteristicProperties::WriteWithoutResponse =>
            {
                GattWriteOption::WriteWithoutResponse
            }
            _ => GattWriteOption::WriteWithResponse,
        }
    }
}

impl Transport for BleSerialTransport {
    async fn connect(&mut self, address: &str) -> Result<bool, TransportError> {
        let raw_address = protocol::parse_address(address)?;
        info!(
            "Connecting to Bluetooth device: {}",
            protocol::format_address(raw_address)
        );

        self.disconnect();

        let device = self.connect_device(raw_address).await?;
        info!("Device found: {:?}", device.Name()?);

        let characteristic = self.get_write_characteristic(&device).await?;
        self.write_option = Self::preferred_write_option(&characteristic);
        debug!("Using write option {:?}", self.write_option);

        self.device = Some(device);
        self.write_characteristic = Some(characteristic);

        Ok(self.is_connected())
    }

    fn is_connected(&self) -> bool {
        self.device
            .as_ref()
            .and_then(|d| d.ConnectionStatus().ok())
            .map(|s| s == BluetoothConnectionStatus::Connected)
            .unwrap_or(false)
    }

    async fn send_message(&mut self, message: &str) -> Result<(), TransportError> {
        let characteristic = self
            .write_characteristic
            .as_ref()
            .ok_or(TransportError::NotConnected)?;
        let payload = protocol::encode_message(message)?;

        for chunk in protocol::chunk_payload(payload, MAX_WRITE_CHUNK) {
            let writer = DataWriter::new()?;
            writer.WriteBytes(chunk)?;
            let buffer = writer.DetachBuffer()?;

            let status = characteristic
                .WriteValueWithOptionAsync(&buffer, self.write_option)?
                .await?;
            if status != GattCommunicationStatus::Success {
                warn!("Write returned status: {:?}", status);
                return Err(TransportError::WriteFailed(format!("{:?}", status)));
            }
        }

        Ok(())
    }

    fn disconnect(&mut self) {
        self.write_characteristic = None;
        if let Some(device) = self.device.take() {
            let _ = device.Close();
            info!("Closed Bluetooth device");
        }
    }
}
