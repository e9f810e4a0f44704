//! Client, pet, appointment, and health-record handlers, plus the public
//! contact form.

use serde_json::Value;

use portal_core::models::{Appointment, Client, ContactMessage, HealthRecord, Pet};
use portal_core::search;
use portal_core::{Record, Repository};

use crate::{ApiError, ApiResult, Caller, PortalApi, SimpleResponse};

impl PortalApi {
    // =========================================================================
    // Generic record plumbing
    // =========================================================================

    pub(crate) fn create_record<T: Record>(&self, record: T) -> ApiResult<T> {
        let store = self.store()?;
        Ok(Repository::<T>::new(&store).create(record)?)
    }

    pub(crate) fn get_record<T: Record>(&self, id: &str) -> ApiResult<T> {
        let store = self.store()?;
        Repository::<T>::new(&store)
            .get(id)?
            .ok_or_else(|| ApiError::NotFound(format!("{} {}", T::KEY_PREFIX, id)))
    }

    pub(crate) fn update_record<T: Record>(&self, id: &str, partial: Value) -> ApiResult<T> {
        let store = self.store()?;
        Ok(Repository::<T>::new(&store).update(id, partial)?)
    }

    pub(crate) fn delete_record<T: Record>(&self, id: &str) -> ApiResult<SimpleResponse> {
        let store = self.store()?;
        Repository::<T>::new(&store).delete(id)?;
        Ok(SimpleResponse::ok("Deleted"))
    }

    pub(crate) fn list_records<T: Record>(&self) -> ApiResult<Vec<T>> {
        let store = self.store()?;
        Ok(Repository::<T>::new(&store).list()?)
    }

    // =========================================================================
    // Clients
    // =========================================================================

    pub fn create_client(&self, caller: &Caller, client: Client) -> ApiResult<Client> {
        self.ensure_staff(caller)?;
        self.create_record(client)
    }

    pub fn get_client(&self, caller: &Caller, client_id: &str) -> ApiResult<Client> {
        self.ensure_client_access(caller, client_id)?;
        self.get_record(client_id)
    }

    pub fn update_client(
        &self,
        caller: &Caller,
        client_id: &str,
        partial: Value,
    ) -> ApiResult<Client> {
        self.ensure_client_access(caller, client_id)?;
        self.update_record(client_id, partial)
    }

    pub fn delete_client(&self, caller: &Caller, client_id: &str) -> ApiResult<SimpleResponse> {
        self.ensure_staff(caller)?;
        self.delete_record::<Client>(client_id)
    }

    pub fn list_clients(&self, caller: &Caller) -> ApiResult<Vec<Client>> {
        self.ensure_staff(caller)?;
        self.list_records()
    }

    pub fn search_clients(
        &self,
        caller: &Caller,
        query: &str,
        limit: usize,
    ) -> ApiResult<Vec<Client>> {
        self.ensure_staff(caller)?;
        let store = self.store()?;
        Ok(search::search_clients(&store, query, limit)?)
    }

    // =========================================================================
    // Pets
    // =========================================================================

    pub fn create_pet(&self, caller: &Caller, pet: Pet) -> ApiResult<Pet> {
        self.ensure_client_access(caller, &pet.client_id)?;
        self.create_record(pet)
    }

    pub fn get_pet(&self, caller: &Caller, pet_id: &str) -> ApiResult<Pet> {
        let pet: Pet = self.get_record(pet_id)?;
        self.ensure_client_access(caller, &pet.client_id)?;
        Ok(pet)
    }

    pub fn update_pet(&self, caller: &Caller, pet_id: &str, partial: Value) -> ApiResult<Pet> {
        // Ownership check against the stored record, not the partial
        let existing: Pet = self.get_record(pet_id)?;
        self.ensure_client_access(caller, &existing.client_id)?;
        self.update_record(pet_id, partial)
    }

    pub fn delete_pet(&self, caller: &Caller, pet_id: &str) -> ApiResult<SimpleResponse> {
        self.ensure_staff(caller)?;
        self.delete_record::<Pet>(pet_id)
    }

    pub fn list_pets(&self, caller: &Caller) -> ApiResult<Vec<Pet>> {
        self.ensure_staff(caller)?;
        self.list_records()
    }

    /// A client's own pets.
    pub fn client_pets(&self, caller: &Caller, client_id: &str) -> ApiResult<Vec<Pet>> {
        self.ensure_client_access(caller, client_id)?;
        let pets: Vec<Pet> = self.list_records()?;
        Ok(pets
            .into_iter()
            .filter(|pet| pet.client_id == client_id)
            .collect())
    }

    pub fn search_pets(
        &self,
        caller: &Caller,
        query: &str,
        client_id: Option<&str>,
        limit: usize,
    ) -> ApiResult<Vec<Pet>> {
        self.ensure_staff(caller)?;
        let store = self.store()?;
        Ok(search::search_pets(&store, query, client_id, limit)?)
    }

    // =========================================================================
    // Appointments
    // =========================================================================

    pub fn create_appointment(
        &self,
        caller: &Caller,
        appointment: Appointment,
    ) -> ApiResult<Appointment> {
        self.ensure_client_access(caller, &appointment.client_id)?;
        self.create_record(appointment)
    }

    pub fn get_appointment(&self, caller: &Caller, appointment_id: &str) -> ApiResult<Appointment> {
        let appointment: Appointment = self.get_record(appointment_id)?;
        self.ensure_client_access(caller, &appointment.client_id)?;
        Ok(appointment)
    }

    pub fn update_appointment(
        &self,
        caller: &Caller,
        appointment_id: &str,
        partial: Value,
    ) -> ApiResult<Appointment> {
        let existing: Appointment = self.get_record(appointment_id)?;
        self.ensure_client_access(caller, &existing.client_id)?;
        self.update_record(appointment_id, partial)
    }

    pub fn delete_appointment(
        &self,
        caller: &Caller,
        appointment_id: &str,
    ) -> ApiResult<SimpleResponse> {
        self.ensure_staff(caller)?;
        self.delete_record::<Appointment>(appointment_id)
    }

    pub fn list_appointments(&self, caller: &Caller) -> ApiResult<Vec<Appointment>> {
        self.ensure_staff(caller)?;
        self.list_records()
    }

    // =========================================================================
    // Health Records
    // =========================================================================

    pub fn create_health_record(
        &self,
        caller: &Caller,
        record: HealthRecord,
    ) -> ApiResult<HealthRecord> {
        self.ensure_staff(caller)?;
        self.create_record(record)
    }

    pub fn get_health_record(&self, caller: &Caller, record_id: &str) -> ApiResult<HealthRecord> {
        let record: HealthRecord = self.get_record(record_id)?;
        // Owners may read their pet's records; resolve the pet for the check
        let pet: Pet = self.get_record(&record.pet_id)?;
        self.ensure_client_access(caller, &pet.client_id)?;
        Ok(record)
    }

    pub fn update_health_record(
        &self,
        caller: &Caller,
        record_id: &str,
        partial: Value,
    ) -> ApiResult<HealthRecord> {
        self.ensure_staff(caller)?;
        self.update_record(record_id, partial)
    }

    pub fn delete_health_record(
        &self,
        caller: &Caller,
        record_id: &str,
    ) -> ApiResult<SimpleResponse> {
        self.ensure_staff(caller)?;
        self.delete_record::<HealthRecord>(record_id)
    }

    /// Records for one pet, owner-or-staff.
    pub fn pet_health_records(
        &self,
        caller: &Caller,
        pet_id: &str,
    ) -> ApiResult<Vec<HealthRecord>> {
        let pet: Pet = self.get_record(pet_id)?;
        self.ensure_client_access(caller, &pet.client_id)?;

        let records: Vec<HealthRecord> = self.list_records()?;
        Ok(records
            .into_iter()
            .filter(|record| record.pet_id == pet_id)
            .collect())
    }

    // =========================================================================
    // Contact Form
    // =========================================================================

    /// `POST /contact` — public, no caller required.
    pub fn submit_contact_message(&self, message: ContactMessage) -> ApiResult<SimpleResponse> {
        self.create_record(message)?;
        Ok(SimpleResponse::ok("Message received"))
    }

    pub fn list_contact_messages(&self, caller: &Caller) -> ApiResult<Vec<ContactMessage>> {
        self.ensure_staff(caller)?;
        self.list_records()
    }
}
